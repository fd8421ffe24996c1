use std::net::IpAddr;

const ALERTIFY_PORT: &str = "ALERTIFY_PORT";

const DEFAULT_PORT: u16 = 5000;

pub fn get_default_port() -> u16 {
    DEFAULT_PORT
}

pub fn get_port() -> Option<u16> {
    std::env::var(ALERTIFY_PORT).ok()?.parse().ok()
}

const ALERTIFY_ADDR: &str = "ALERTIFY_ADDR";

pub fn get_addr() -> Option<IpAddr> {
    std::env::var(ALERTIFY_ADDR).ok()?.parse().ok()
}

const ALERTIFY_SEED: &str = "ALERTIFY_SEED";

pub fn get_seed() -> Option<bool> {
    parse_flag(&std::env::var(ALERTIFY_SEED).ok()?)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
