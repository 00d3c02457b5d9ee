#[tokio::main]
async fn main() -> std::io::Result<()> {
    rect_game::run_with_config().await
}
