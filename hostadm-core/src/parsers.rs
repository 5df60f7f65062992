//! Text parsers for the command output the collector scrapes.
//!
//! All functions are total: malformed input yields `None` or an empty list,
//! never a panic. Keeping them free of command invocation lets the parsing
//! be tested against canned fixtures.

use serde_json::Value;

/// Integer percentage with round-half-up; `None` when `total` is zero.
pub fn percent_round_half_up(used: u64, total: u64) -> Option<u32> {
    if total == 0 {
        return None;
    }
    Some(((used as f64 / total as f64) * 100.0 + 0.5).floor() as u32)
}

/// Extract the idle percentage from `mpstat 1 1` output.
///
/// The header row names the columns; the `Average:` row carries the summary
/// values at the same token positions.
pub fn parse_mpstat_idle(text: &str) -> Option<f32> {
    let idle_col = text
        .lines()
        .find(|l| l.contains("%idle"))?
        .split_whitespace()
        .position(|t| t == "%idle")?;
    text.lines()
        .find(|l| l.starts_with("Average"))?
        .split_whitespace()
        .nth(idle_col)?
        .replace(',', ".")
        .parse()
        .ok()
}

/// Extract the idle percentage from the `%Cpu(s)` summary line of `top -bn1`.
pub fn parse_top_idle(text: &str) -> Option<f32> {
    let line = text.lines().find(|l| l.contains("Cpu(s)"))?;
    line.split(',')
        .filter_map(|field| field.trim().strip_suffix("id"))
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Total and used bytes from the `Mem:` row of `free -b`.
pub fn parse_free(text: &str) -> Option<(u64, u64)> {
    let line = text.lines().find(|l| l.starts_with("Mem:"))?;
    let mut fields = line.split_whitespace().skip(1);
    let total = fields.next()?.parse().ok()?;
    let used = fields.next()?.parse().ok()?;
    Some((total, used))
}

/// Total and used bytes derived from `/proc/meminfo`: `MemTotal` minus
/// `MemAvailable`, both reported in kiB.
pub fn parse_meminfo(text: &str) -> Option<(u64, u64)> {
    let total = meminfo_field(text, "MemTotal:")? * 1024;
    let available = meminfo_field(text, "MemAvailable:")? * 1024;
    Some((total, total.saturating_sub(available)))
}

fn meminfo_field(text: &str, name: &str) -> Option<u64> {
    text.lines()
        .find(|l| l.starts_with(name))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}

/// Per-filesystem usage from `df -P`: one (mount target, percent used) pair
/// per device-backed mount. Pseudo-filesystems (tmpfs, proc, ...) have
/// non-/dev sources and are skipped. Row order is preserved.
pub fn parse_df(text: &str) -> Vec<(String, f32)> {
    let mut mounts = Vec::new();
    for line in text.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 6 || !fields[0].starts_with("/dev/") {
            continue;
        }
        if let Some(pct) = fields[4].strip_suffix('%').and_then(|v| v.parse::<f32>().ok()) {
            // mount targets may themselves contain spaces
            mounts.push((fields[5..].join(" "), pct));
        }
    }
    mounts
}

/// Mounted-filesystem usage from `lsblk -J -o NAME,MOUNTPOINT,FSUSE%`.
/// lsblk only reports block devices, so everything here is device-backed.
pub fn parse_lsblk_json(text: &str) -> Vec<(String, f32)> {
    let mut mounts = Vec::new();
    if let Ok(data) = serde_json::from_str::<Value>(text) {
        if let Some(devices) = data["blockdevices"].as_array() {
            for device in devices {
                collect_lsblk_mounts(device, &mut mounts);
            }
        }
    }
    mounts
}

fn collect_lsblk_mounts(node: &Value, mounts: &mut Vec<(String, f32)>) {
    if let (Some(mount), Some(used)) = (node["mountpoint"].as_str(), node["fsuse%"].as_str()) {
        if mount != "[SWAP]" {
            if let Some(pct) = used.strip_suffix('%').and_then(|v| v.parse::<f32>().ok()) {
                mounts.push((mount.to_string(), pct));
            }
        }
    }
    if let Some(children) = node["children"].as_array() {
        for child in children {
            collect_lsblk_mounts(child, mounts);
        }
    }
}
