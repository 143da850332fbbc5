#[tokio::main]
async fn main() {
    cakeshop::start_server().await;
}
