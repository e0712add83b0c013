#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    ensaio_local_server::run().await
}
