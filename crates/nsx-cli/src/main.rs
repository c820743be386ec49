//! 🚀 nsx-cli — the front door, the bouncer, the maitre d' of newsync.
//!
//! 📦 This binary crate is the thin wrapper that sets up logging, loads
//! config, and then lets the library do the heavy lifting. Like a manager. 🦆
//!
//! 🔧 Steps:
//! 1. Init tracing (so we can see what goes wrong, and when)
//! 2. Resolve the optional config-file argument
//! 3. Load config (the moment of truth)
//! 4. Run the load (send it)
//! 5. Handle errors (cry, then exit 1)

use anyhow::{Context, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 📡 Set up tracing — because println! debugging is a lifestyle choice
    // we're trying to move past, like flip phones and cargo shorts.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 🎯 One optional argument: the config file path. Default: nsx.toml.
    let args: Vec<String> = std::env::args().collect();
    let path_arg = args.get(1).cloned().unwrap_or_else(|| "nsx.toml".to_string());

    // 🔒 Validate the config file exists before we get too emotionally attached.
    // A missing *default* file is fine — env-only config is a supported life.
    // A missing *explicitly named* file would also land here; the error from
    // try_exists covers the genuinely unreadable cases.
    let config_file = std::path::Path::new(&path_arg);
    let config_file_path_which_is_validated_to_exist = match config_file.try_exists()
        .context(format!("💀 Couldn't even check whether the configuration file exists. Maybe it's a pwd/cwd relative-path issue — use an absolute path, to be absolutely certain. Was checking here: '{}'", config_file.display()))?
    {
        true => Some(config_file),
        false => None,
    };

    // 🔧 Load the config — this is where we find out if the TOML is valid,
    // and whether someone remembered that credentials are not optional.
    let app_config = nsx::app_config::load_config(config_file_path_which_is_validated_to_exist)
        .context("💀 Couldn't load the configuration. Check the file and the NSX_* environment — url, username, password, and ingest.file_name are all required, no fallbacks, no secret defaults baked into the binary.")?;

    // 🚀 SEND IT. One shot. That's the whole product.
    let result = nsx::run(app_config).await;

    match result {
        Ok(summary) => {
            // 🧾 The reporter's table goes to stdout; logs went to stderr.
            println!("{}", summary.render());
        }
        Err(err) => {
            // 💀 Error handling: the part where we find out what went wrong
            // and print it in a way that's helpful at 3am.
            error!("💀 error: {}", err);
            // 🧅 peel the onion of sadness, one layer at a time
            let mut the_vibes_are_giving_connection_issues = false;
            for cause in err.chain().skip(1) {
                error!("⚠️  cause: {}", cause);
                // 🕵️ sniff each cause for the telltale smell of a cluster that isn't there
                let cause_str = cause.to_string();
                if cause_str.contains("error sending request")
                    || cause_str.contains("connection refused")
                    || cause_str.contains("Connection refused")
                    || cause_str.contains("tcp connect error")
                    || cause_str.contains("dns error")
                {
                    the_vibes_are_giving_connection_issues = true;
                }
            }

            // 📡 if it smells like a connection problem, it's probably a connection problem
            if the_vibes_are_giving_connection_issues {
                error!(
                    "🔧 hint: looks like the cluster isn't reachable. \
                    Double-check that Elasticsearch is actually running. If you're \
                    using Docker, try: `docker ps` to see what's up, or \
                    `docker compose up -d` to resurrect it. Even clusters need a nudge sometimes. ☕"
                );
            }

            // 🗑️ Exit with prejudice. Process exitus maximus.
            std::process::exit(1);
        }
    }

    Ok(())
}
