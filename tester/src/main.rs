use serde_json::json;

const BASE_URL: &str = "http://127.0.0.1:8000";

#[tokio::main]
async fn main() {
    let client = reqwest::Client::new();

    let cakes: serde_json::Value = client
        .get(format!("{BASE_URL}/cakes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    println!("Catalog: {cakes:#}");

    let created: serde_json::Value = client
        .post(format!("{BASE_URL}/cakes"))
        .json(&json!({
            "name": "Наполеон",
            "description": "Слоёный торт с заварным кремом",
            "price": 4800.0,
            "stock": 2
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    println!("Created: {created:#}");

    let reply: serde_json::Value = client
        .post(format!("{BASE_URL}/chatbot"))
        .json(&json!({ "message": "Есть ли у вас Медовик?" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    println!("Chat: {reply:#}");

    let fallback: serde_json::Value = client
        .post(format!("{BASE_URL}/chatbot"))
        .json(&json!({ "message": "Посоветуйте что-нибудь к чаю" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    println!("Chat fallback: {fallback:#}");
}
