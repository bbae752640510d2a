#[actix_web::main]
async fn main() -> std::io::Result<()> {
    lease_contract_server::run().await
}
