use lib_ryo::init;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init().await
}
