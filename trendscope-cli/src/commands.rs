//! CLI command implementations

use std::io::Write;
use std::net::IpAddr;

use anyhow::Context;
use clap::{Subcommand, ValueEnum};
use trendscope_core::TrendscopeConfig;
use trendscope_core::config::DEFAULT_PORT;
use trendscope_trends::{RelatedKind, SearchVolumePoint, TrendsService};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the JSON API server
    Serve {
        /// Host to bind to (overrides BIND_ADDR)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides BIND_ADDR)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch search volumes for one or more terms
    Volumes {
        /// Comma-separated search terms
        #[arg(short, long, value_delimiter = ',', required = true)]
        terms: Vec<String>,
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,
        /// Last day of the range (YYYY-MM-DD)
        #[arg(long)]
        end_date: String,
        /// Timeline resolution: day, week, month or year
        #[arg(long, default_value = "day")]
        frequency: String,
        /// Geo restriction kind: country, dma or region
        #[arg(long, default_value = "country")]
        geo: String,
        /// Geo restriction code, e.g. US, 501 or US-NY
        #[arg(long, default_value = "US")]
        geo_option: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Fetch top related topics or queries for a term
    Related {
        /// Search term
        #[arg(long)]
        term: String,
        /// Geography code, e.g. US
        #[arg(long, default_value = "US")]
        geography: String,
        /// Start of the range (YYYY-MM)
        #[arg(long)]
        start_date: String,
        /// End of the range (YYYY-MM)
        #[arg(long)]
        end_date: String,
        /// Ranking to fetch
        #[arg(long, value_enum, default_value_t = RelatedKind::Topic)]
        kind: RelatedKind,
    },
}

/// Output formats for search volume results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for terminals
    Table,
    /// JSON array, same shape as the HTTP API
    Json,
    /// CSV with a Term,Date,Value header
    Csv,
}

/// Handle the CLI command
///
/// # Errors
/// - Missing or invalid configuration
/// - Trends API failures
/// - Server bind or serve failures
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let config = TrendscopeConfig::from_env().context("failed to load configuration")?;

    match command {
        Commands::Serve { host, port } => serve(config, host, port).await,
        Commands::Volumes {
            terms,
            start_date,
            end_date,
            frequency,
            geo,
            geo_option,
            format,
        } => {
            let service = TrendsService::new(config.trends)?;
            let records = service
                .get_search_volumes(terms, start_date, end_date, frequency, &geo, geo_option)
                .await?;
            write_records(&records, format, std::io::stdout().lock())
        }
        Commands::Related {
            term,
            geography,
            start_date,
            end_date,
            kind,
        } => {
            let service = TrendsService::new(config.trends)?;
            let response = service
                .get_related(term, geography, start_date, end_date, kind)
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}

/// Start the API server, applying host/port overrides to the bind address.
async fn serve(
    mut config: TrendscopeConfig,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    config.server.bind_addr = override_bind_addr(&config.server.bind_addr, host, port);
    trendscope_web::run_server(config).await?;
    Ok(())
}

/// Replace the host and/or port of `bind_addr`.
///
/// IPv6 hosts are bracketed; an address without a port gets [`DEFAULT_PORT`].
fn override_bind_addr(bind_addr: &str, host: Option<String>, port: Option<u16>) -> String {
    let default_port = DEFAULT_PORT.to_string();
    let (current_host, current_port) = if bind_addr.parse::<IpAddr>().is_ok() {
        (bind_addr, default_port.as_str())
    } else {
        bind_addr
            .rsplit_once(':')
            .unwrap_or((bind_addr, default_port.as_str()))
    };

    let host = host.unwrap_or_else(|| current_host.to_string());
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let port = port.map_or_else(|| current_port.to_string(), |p| p.to_string());

    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Render search volume records in the requested format.
///
/// # Errors
/// - Output stream write failures
pub fn write_records<W: Write>(
    records: &[SearchVolumePoint],
    format: OutputFormat,
    mut out: W,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, records)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["Term", "Date", "Value"])?;
            for record in records {
                writer.write_record([
                    record.term.as_str(),
                    record.date.as_str(),
                    record.value.to_string().as_str(),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            let width = records
                .iter()
                .map(|r| r.term.len())
                .max()
                .unwrap_or(0)
                .max(4);
            writeln!(out, "{:<width$}  {:<12}  {:>8}", "TERM", "DATE", "VALUE")?;
            for record in records {
                writeln!(
                    out,
                    "{:<width$}  {:<12}  {:>8}",
                    record.term,
                    record.date,
                    record.value.to_string()
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use serde_json::Number;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    fn records() -> Vec<SearchVolumePoint> {
        vec![
            SearchVolumePoint {
                term: "flu".to_string(),
                date: "2020-01-01".to_string(),
                value: Number::from(10),
            },
            SearchVolumePoint {
                term: "flu, seasonal".to_string(),
                date: "2020-01-02".to_string(),
                value: Number::from_f64(12.5).unwrap(),
            },
        ]
    }

    #[test]
    fn test_csv_output() {
        let mut out = Vec::new();
        write_records(&records(), OutputFormat::Csv, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Term,Date,Value");
        assert_eq!(lines[1], "flu,2020-01-01,10");
        assert_eq!(lines[2], "\"flu, seasonal\",2020-01-02,12.5");
    }

    #[test]
    fn test_json_output() {
        let mut out = Vec::new();
        write_records(&records(), OutputFormat::Json, &mut out).unwrap();

        let parsed: Vec<SearchVolumePoint> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, records());
    }

    #[test]
    fn test_table_output() {
        let mut out = Vec::new();
        write_records(&records(), OutputFormat::Table, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("TERM"));
    }

    #[test]
    fn test_override_bind_addr() {
        assert_eq!(
            override_bind_addr("127.0.0.1:3000", None, Some(8080)),
            "127.0.0.1:8080"
        );
        assert_eq!(
            override_bind_addr("127.0.0.1:3000", Some("0.0.0.0".to_string()), None),
            "0.0.0.0:3000"
        );
        assert_eq!(override_bind_addr("127.0.0.1:3000", None, None), "127.0.0.1:3000");
    }

    #[test]
    fn test_override_bind_addr_ipv6() {
        assert_eq!(
            override_bind_addr("127.0.0.1:3000", Some("::1".to_string()), None),
            "[::1]:3000"
        );
        assert_eq!(
            override_bind_addr("[::1]:4000", None, Some(8080)),
            "[::1]:8080"
        );
        assert_eq!(
            override_bind_addr("0.0.0.0", None, None),
            format!("0.0.0.0:{DEFAULT_PORT}")
        );
        assert_eq!(override_bind_addr("::", None, Some(80)), "[::]:80");
    }

    #[test]
    fn test_related_kind_parsed_by_clap() {
        let cli = TestCli::try_parse_from([
            "trendscope",
            "related",
            "--term",
            "flu",
            "--start-date",
            "2020-01",
            "--end-date",
            "2020-02",
            "--kind",
            "queries",
        ])
        .unwrap();
        match cli.command {
            Commands::Related { kind, .. } => assert_eq!(kind, RelatedKind::Query),
            _ => panic!("Expected related command"),
        }

        let rejected = TestCli::try_parse_from([
            "trendscope",
            "related",
            "--term",
            "flu",
            "--start-date",
            "2020-01",
            "--end-date",
            "2020-02",
            "--kind",
            "trending",
        ]);
        assert!(rejected.is_err());
    }
}
