//! Linux `/proc` readers for data sysinfo does not expose: per-device disk
//! I/O counters and the inet socket table with owning processes.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::Path;

use crate::core::host_metrics::{DiskIoCounters, SocketEntry};

const SECTOR_SIZE: u64 = 512;

/// Parse `/proc/diskstats`.
pub fn parse_diskstats(text: &str) -> Vec<DiskIoCounters> {
    text.lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 10 {
                return None;
            }
            let num = |i: usize| fields[i].parse::<u64>().ok();

            Some(DiskIoCounters {
                device: fields[2].to_string(),
                read_count: num(3)?,
                read_bytes: num(5)? * SECTOR_SIZE,
                write_count: num(7)?,
                write_bytes: num(9)? * SECTOR_SIZE,
            })
        })
        .collect()
}

pub fn read_diskstats() -> io::Result<Vec<DiskIoCounters>> {
    Ok(parse_diskstats(&fs::read_to_string("/proc/diskstats")?))
}

/// Whole disks have an entry directly under `/sys/block`; partitions do not.
pub fn is_whole_disk(device: &str) -> bool {
    Path::new("/sys/block").join(device).exists()
}

/// Transport of a `/proc/net/*` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp,
    Udp,
}

/// A socket as listed in `/proc/net/{tcp,udp}{,6}`, before pid resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSocket {
    pub local: SocketAddr,
    pub remote: Option<SocketAddr>,
    pub status: String,
    pub inode: u64,
}

const NET_TABLES: [(&str, Transport); 4] = [
    ("/proc/net/tcp", Transport::Tcp),
    ("/proc/net/tcp6", Transport::Tcp),
    ("/proc/net/udp", Transport::Udp),
    ("/proc/net/udp6", Transport::Udp),
];

fn tcp_state(code: &str) -> &'static str {
    match code {
        "01" => "ESTABLISHED",
        "02" => "SYN_SENT",
        "03" => "SYN_RECV",
        "04" => "FIN_WAIT1",
        "05" => "FIN_WAIT2",
        "06" => "TIME_WAIT",
        "07" => "CLOSE",
        "08" => "CLOSE_WAIT",
        "09" => "LAST_ACK",
        "0A" => "LISTEN",
        "0B" => "CLOSING",
        "0C" => "SYN_RECV",
        _ => "UNKNOWN",
    }
}

/// Decode a kernel `ADDR:PORT` pair. Address words are in host byte order.
fn parse_hex_addr(field: &str) -> Option<SocketAddr> {
    let (addr, port) = field.split_once(':')?;
    let port = u16::from_str_radix(port, 16).ok()?;

    let ip = match addr.len() {
        8 => {
            let word = u32::from_str_radix(addr, 16).ok()?;
            IpAddr::V4(Ipv4Addr::from(word.to_ne_bytes()))
        }
        32 => {
            let mut octets = [0u8; 16];
            for (i, chunk) in octets.chunks_mut(4).enumerate() {
                let word = u32::from_str_radix(&addr[i * 8..i * 8 + 8], 16).ok()?;
                chunk.copy_from_slice(&word.to_ne_bytes());
            }
            IpAddr::V6(Ipv6Addr::from(octets))
        }
        _ => return None,
    };

    Some(SocketAddr::new(ip, port))
}

/// Parse one `/proc/net` socket table.
pub fn parse_net_table(text: &str, transport: Transport) -> Vec<RawSocket> {
    text.lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 10 {
                return None;
            }

            let local = parse_hex_addr(fields[1])?;
            let remote = parse_hex_addr(fields[2])
                .filter(|addr| !(addr.ip().is_unspecified() && addr.port() == 0));
            let status = match transport {
                Transport::Tcp => tcp_state(fields[3]),
                Transport::Udp => "NONE",
            };

            Some(RawSocket {
                local,
                remote,
                status: status.to_string(),
                inode: fields[9].parse().ok()?,
            })
        })
        .collect()
}

/// Map socket inodes to the pids holding them. Processes we may not inspect,
/// or that exit mid-scan, are skipped.
fn socket_owners() -> HashMap<u64, u32> {
    let mut owners = HashMap::new();
    let Ok(entries) = fs::read_dir("/proc") else {
        return owners;
    };

    for entry in entries.flatten() {
        let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) else {
            continue;
        };
        let Ok(fds) = fs::read_dir(entry.path().join("fd")) else {
            continue;
        };

        for fd in fds.flatten() {
            let Ok(target) = fs::read_link(fd.path()) else {
                continue;
            };
            if let Some(inode) = parse_socket_link(&target.to_string_lossy()) {
                owners.entry(inode).or_insert(pid);
            }
        }
    }

    owners
}

fn parse_socket_link(target: &str) -> Option<u64> {
    target
        .strip_prefix("socket:[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}

fn process_name(pid: u32) -> Option<String> {
    fs::read_to_string(format!("/proc/{}/comm", pid))
        .ok()
        .map(|name| name.trim_end().to_string())
        .filter(|name| !name.is_empty())
}

/// Read every inet socket table and attach owning pid and process name.
pub fn read_socket_table() -> Vec<SocketEntry> {
    let mut raw = Vec::new();
    for (path, transport) in NET_TABLES {
        match fs::read_to_string(path) {
            Ok(text) => raw.extend(parse_net_table(&text, transport)),
            Err(e) => log::debug!("Skipping {}: {}", path, e),
        }
    }

    let owners = socket_owners();

    raw.into_iter()
        .map(|socket| {
            let pid = owners.get(&socket.inode).copied().filter(|&pid| pid != 0);
            SocketEntry {
                remote: socket.remote,
                status: Some(socket.status),
                pid,
                process_name: pid.and_then(process_name),
            }
        })
        .collect()
}
