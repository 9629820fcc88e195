mod lookup;

use anyhow::Context;
use clap::Parser;
use dns_codec::{Message, QueryBuilder, RecordType, DEFAULT_QUERY_ID};
use lookup::Lookup;
use std::net::{Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Sends a single DNS query over UDP and prints the decoded reply.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Record type to ask for: A, NS, CNAME, MX or TXT, in any case.
    record_type: RecordType,

    /// Domain name to look up.
    domain: String,

    /// IPv4 address of the name server.
    server: Ipv4Addr,

    /// UDP port of the name server.
    #[arg(long, default_value_t = 53)]
    port: u16,

    /// Seconds to wait for the reply. Waits indefinitely when not given.
    #[arg(long)]
    timeout: Option<u64>,

    /// Transaction id of the query.
    #[arg(long, default_value_t = DEFAULT_QUERY_ID)]
    id: u16,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => e.exit(),
    };

    let query = match QueryBuilder::new()
        .id(cli.id)
        .name(&cli.domain)
        .q_type(cli.record_type)
        .build()
        .to_bytes()
    {
        Ok(query) => query,
        Err(e) => {
            eprintln!("invalid domain {:?}: {}", cli.domain, e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let server = SocketAddr::from((cli.server, cli.port));
    let reply = Lookup::new(server)
        .timeout(cli.timeout.map(Duration::from_secs))
        .exchange(&query)
        .await
        .with_context(|| format!("lookup against {} failed", server))?;

    println!("received {} bytes", reply.len());
    let message = Message::from_bytes(&reply).context("could not read the reply")?;
    if message.header.id != cli.id {
        warn!(
            "Reply id {:#06x} does not match query id {:#06x}",
            message.header.id, cli.id
        );
    }
    info!("{} answer(s) from {}", message.answers.len(), server);
    print!("{}", message);

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod test {
    use super::Cli;
    use clap::{CommandFactory, Parser};
    use dns_codec::{RecordType, DEFAULT_QUERY_ID};
    use std::net::Ipv4Addr;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["dnstool", "mX", "example.com", "8.8.8.8"]).unwrap();
        assert_eq!(cli.record_type, RecordType::MX);
        assert_eq!(cli.domain, "example.com");
        assert_eq!(cli.server, Ipv4Addr::new(8, 8, 8, 8));
        assert_eq!(cli.port, 53);
        assert_eq!(cli.timeout, None);
        assert_eq!(cli.id, DEFAULT_QUERY_ID);

        let cli = Cli::try_parse_from([
            "dnstool",
            "txt",
            "example.org",
            "1.1.1.1",
            "--port",
            "5353",
            "--timeout",
            "3",
            "--id",
            "7",
        ])
        .unwrap();
        assert_eq!(cli.port, 5353);
        assert_eq!(cli.timeout, Some(3));
        assert_eq!(cli.id, 7);
    }

    #[test]
    fn test_usage_errors() {
        assert!(Cli::try_parse_from(["dnstool", "a", "example.com"]).is_err());
        assert!(Cli::try_parse_from(["dnstool", "aaaa", "example.com", "8.8.8.8"]).is_err());
        assert!(Cli::try_parse_from(["dnstool", "a", "example.com", "not-an-ip"]).is_err());
    }
}
