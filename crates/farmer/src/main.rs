#[tokio::main]
async fn main() {
    farmer::start(std::env::args()).await;
}
