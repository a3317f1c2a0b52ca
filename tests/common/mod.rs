//! CSV fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const MACRO: &str = "date,rwa_tvl,total_stablecoin_mcap,treasury_yield,m2_supply
2024-01-31,8000000000,130000000000,4.0,20800000000000
2024-02-29,9000000000,140000000000,4.2,20900000000000
2024-03-31,10000000000,150000000000,4.3,21000000000000
2024-04-30,12000000000,155000000000,4.6,21100000000000
";

pub const SHARES: &str = "date,asset_type,tvl,share
2024-01-31,Treasury,4000000000,0.5
2024-01-31,Private Credit,3000000000,0.375
2024-01-31,Diversified,1000000000,0.125
2024-02-29,Treasury,5000000000,0.5
2024-02-29,Private Credit,4000000000,0.4
2024-02-29,Diversified,1000000000,0.1
2024-03-31,Treasury,6000000000,0.6
2024-03-31,Private Credit,3000000000,0.3
2024-03-31,Diversified,1000000000,0.1
";

pub const CHAINS: &str = "date,chain,tvl,share_within_chains
2024-01-31,Ethereum,6000000000,0.75
2024-01-31,Polygon,2000000000,0.25
2024-02-29,Ethereum,7000000000,0.7
2024-02-29,Polygon,3000000000,0.3
";

pub const PROTOCOL_HISTORY: &str = "date,protocol,tvl
2024-01-31,Ondo,600000000
2024-01-31,Maple,400000000
2024-02-29,Ondo,700000000
2024-02-29,Maple,300000000
";

pub const PROTOCOL_LATEST: &str = "protocol,tvl,share_of_rwa
Maple,300000000,0.03
Ondo,700000000,0.07
";

pub const YIELDS: &str = "date,yield_10y
2024-01-31,3.99
2024-02-29,
2024-03-31,4.20
";

pub const GAUGE: &str = "date,m2_growth,liquidity_environment
2024-01-31,-2.0,Contraction
2024-02-29,1.0,Neutral
2024-03-31,4.0,Expansion
";

/// Write every source into `dir`.
pub fn write_all(dir: &Path) {
    for (name, body) in [
        ("viz1_macro_vs_rwa.csv", MACRO),
        ("viz2_asset_type_shares.csv", SHARES),
        ("viz3_chain_allocation.csv", CHAINS),
        ("viz4_protocol_timeseries.csv", PROTOCOL_HISTORY),
        ("viz4_protocol_latest.csv", PROTOCOL_LATEST),
        ("viz5_yield_timeseries.csv", YIELDS),
        ("m2_liquidity_gauge.csv", GAUGE),
    ] {
        fs::write(dir.join(name), body).unwrap();
    }
}
