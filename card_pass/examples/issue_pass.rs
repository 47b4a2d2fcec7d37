use card_pass::{payload, ContactRecord, PassConfig, PassIssuer, SigningClient};

#[tokio::main]
async fn main() {
    // Optional settings document as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).expect("Failed to read settings file");
            PassConfig::from_json(&json).expect("Invalid settings file")
        }
        None => PassConfig::default(),
    };

    println!("Building pass for signer at {}", config.signer_base_url);

    // 1. Build the unsigned payload
    let card = ContactRecord {
        company: "Example Co".to_string(),
        title: "Designer".to_string(),
        email: "alex@example.com".to_string(),
        phone: "+1-555-0100".to_string(),
        website: "https://example.com".to_string(),
        ..ContactRecord::new("Alex Johnson")
    };
    let payload = payload::build_payload(&card, &config).expect("Failed to build payload");

    println!("Payload {}:", payload.fingerprint());
    for (name, digest) in payload.manifest() {
        println!("   {:<14} {}", name, digest);
    }

    // 2. Probe the signer
    let client = SigningClient::new(config);
    match client.health_check().await {
        Ok(health) => println!("Signer is {} (version {})", health.status, health.version),
        Err(e) => {
            println!("Signer unavailable: {}", e);
            return;
        }
    }

    // 3. Sign
    let issuer = PassIssuer::with_default_validator(client);
    match issuer.issue(&card).await {
        Ok(signed) => {
            std::fs::write("card.pkpass", &signed).expect("Failed to write card.pkpass");
            println!("Wrote card.pkpass ({} bytes)", signed.len());
        }
        Err(e) => println!("Signing failed: {}", e),
    }
}
