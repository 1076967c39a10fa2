use anyhow::Result;
use clap::{value_parser, Arg, ArgMatches, Command};
use std::net::IpAddr;
use std::path::PathBuf;

use hostmetrics::commands;

fn build_cli() -> Command {
    Command::new("hostmetrics")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Serve host CPU, memory, disk, network, process and log metrics as JSON")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file with a [Logs] section mapping log names to paths")
                .required(true)
                .value_parser(value_parser!(PathBuf))
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on")
                .default_value("5000")
                .value_parser(value_parser!(u16))
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("ADDR")
                .help("Address to bind")
                .default_value("0.0.0.0")
                .value_parser(value_parser!(IpAddr))
        )
        .arg(
            Arg::new("ping-timeout")
                .long("ping-timeout")
                .value_name("SECS")
                .help("Timeout for the /network_info latency probe")
                .default_value("4")
                .value_parser(value_parser!(u64))
        )
        .arg(
            Arg::new("tunnel")
                .long("tunnel")
                .help("Expose the server publicly through localtunnel (`lt`)")
                .action(clap::ArgAction::SetTrue)
        )
        .arg(
            Arg::new("subdomain")
                .long("subdomain")
                .value_name("NAME")
                .help("Subdomain to request from the tunnel")
                .requires("tunnel")
        )
        .arg(
            Arg::new("tunnel-url-file")
                .long("tunnel-url-file")
                .value_name("FILE")
                .help("Write the public tunnel URL to this file once known")
                .requires("tunnel")
                .value_parser(value_parser!(PathBuf))
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(clap::ArgAction::SetTrue)
        )
}

fn main() -> Result<()> {
    let matches: ArgMatches = build_cli().get_matches();

    hostmetrics::init_logging(matches.get_flag("verbose"));

    commands::serve(&matches)
}
