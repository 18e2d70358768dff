use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use super::common::open_wallet;

pub fn run(wallet_path: Option<PathBuf>) -> Result<()> {
    let ledger = open_wallet(wallet_path)?;
    println!("balance: {} sat", ledger.balance_sats());
    println!("mint:    {}", ledger.configured_mint_url());

    let mut per_mint: BTreeMap<String, (usize, u64)> = BTreeMap::new();
    for record in ledger.proofs() {
        let entry = per_mint.entry(record.mint_url.clone()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += record.amount();
    }
    for (mint_url, (count, sats)) in per_mint {
        println!("  {mint_url}: {count} proofs, {sats} sat");
    }
    Ok(())
}
