use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

use xiangqi_core::{Rules, SoldierAdvance};

/// Xiangqi game server and move relay
#[derive(Parser, Debug, Clone)]
#[command(name = "xiangqi-web", version, about, long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "XIANGQI_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Buffered relay messages per room before slow sockets start lagging
    #[arg(long, env = "XIANGQI_RELAY_CAPACITY", default_value_t = 64)]
    pub relay_capacity: usize,

    /// Log filter, used when RUST_LOG is unset
    #[arg(long, env = "XIANGQI_LOG", default_value = "info")]
    pub log: String,

    /// What stops a soldier stepping forward
    #[arg(long, value_enum, default_value_t = CliSoldierAdvance::BlockedByOwn)]
    pub soldier_advance: CliSoldierAdvance,

    /// Block elephants whose diagonal midpoint is occupied
    #[arg(long)]
    pub elephant_eye: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliSoldierAdvance {
    BlockedByOwn,
    BlockedByAny,
}

impl From<CliSoldierAdvance> for SoldierAdvance {
    fn from(value: CliSoldierAdvance) -> Self {
        match value {
            CliSoldierAdvance::BlockedByOwn => SoldierAdvance::BlockedByOwn,
            CliSoldierAdvance::BlockedByAny => SoldierAdvance::BlockedByAny,
        }
    }
}

impl Config {
    pub fn rules(&self) -> Rules {
        Rules::new()
            .soldier_advance(self.soldier_advance.into())
            .elephant_eye(self.elephant_eye)
    }
}
