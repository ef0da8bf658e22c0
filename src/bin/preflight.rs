use desci_registry::domain::project::{parse_index, record_key, INDEX_KEY};
use desci_registry::domain::ProjectRecord;
use desci_registry::infra::{config::Config, logging, store};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads env vars (or .env):\n\
           KV_BACKEND (memory|postgres|http), DATABASE_URL, KV_GATEWAY_URL,\n\
           CONTRACT_ADDRESS, CHAIN_ID\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    logging::init();
    let config = Config::from_env()?;

    println!("> Preflight:");
    println!("  KV_BACKEND={}", config.backend.label());
    println!("  CONTRACT_ADDRESS={}", config.contract_address);
    println!("  CHAIN_ID={}", config.chain_id);

    let kv = store::connect(&config.backend).await?;
    if !kv.is_available().await? {
        return Err(anyhow::anyhow!("store '{}' reports unavailable", kv.backend_name()));
    }
    println!("> Store '{}' is available.", kv.backend_name());

    let index_bytes = kv.get_data(INDEX_KEY).await?;
    let ids = parse_index(&index_bytes).map_err(|e| anyhow::anyhow!("{}: {}", INDEX_KEY, e))?;
    println!("> Index '{}' lists {} project(s).", INDEX_KEY, ids.len());

    // Same checks the registry applies when listing, reported instead of skipped.
    let mut problems = 0usize;
    for id in &ids {
        let key = record_key(id);
        let bytes = kv.get_data(&key).await?;
        if bytes.is_empty() {
            println!("  ! {}: indexed but missing", key);
            problems += 1;
            continue;
        }
        if let Err(e) = serde_json::from_slice::<ProjectRecord>(&bytes) {
            println!("  ! {}: unparseable ({})", key, e);
            problems += 1;
        }
    }

    if problems == 0 {
        println!("> All indexed records are readable.");
    } else {
        println!("> {} indexed record(s) will be skipped by listings.", problems);
    }
    Ok(())
}
