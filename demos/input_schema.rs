//! Print the JSON schema of the raw input contract, for collaborators
//! wiring the open-data fetch layer.
//!
//! Run with: cargo run --example input_schema

use anyhow::Result;
use financial_indicator_engine::StatementRows;

fn main() -> Result<()> {
    println!("{}", StatementRows::schema_as_json()?);
    Ok(())
}
