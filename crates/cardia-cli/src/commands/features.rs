//! The `features` subcommand: print the static feature catalogue as JSON.
use anyhow::Result;

use cardia_model::schema;

pub fn run_features() -> Result<()> {
    let catalogue = schema::catalogue();
    println!("{}", serde_json::to_string_pretty(&catalogue)?);
    Ok(())
}
