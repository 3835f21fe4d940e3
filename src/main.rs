#[actix_web::main]
async fn main() -> std::io::Result<()> {
    birth_certificate_server::run().await
}
