//! Per-server runtime statistics from `show stat`.
//!
//! The runtime API answers `show stat` with CSV: a header line starting with
//! `#` naming the columns, then one row per proxy/server. Only server rows
//! are kept; the `FRONTEND` and `BACKEND` aggregate rows are dropped.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Result;
use crate::relay::{ResponseFraming, SocketRelay};

pub const SHOW_STAT: &str = "show stat";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStat {
    pub backend: String,
    pub server: String,
    pub status: String,
    pub check_status: String,
    pub last_check: String,
    /// Seconds since the last status change.
    pub last_change: Option<u64>,
}

/// Relay `show stat` and parse the server rows, optionally for one backend.
pub async fn fetch_server_stats<F: ResponseFraming>(
    relay: &SocketRelay<F>,
    backend: Option<&str>,
) -> Result<Vec<ServerStat>> {
    let result = relay.execute(SHOW_STAT).await?;
    let stats = parse_show_stat(&result.output, backend);
    tracing::debug!(servers = stats.len(), backend = ?backend, "Parsed runtime statistics");
    Ok(stats)
}

/// Parse `show stat` output. Rows whose width differs from the header are skipped.
pub fn parse_show_stat(output: &str, backend: Option<&str>) -> Vec<ServerStat> {
    let mut header: Option<Vec<String>> = None;
    let mut stats = Vec::new();

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line == "#" {
            continue;
        }
        if let Some(columns) = line.strip_prefix('#') {
            header = Some(split_csv(columns.trim_start()));
            continue;
        }
        let Some(columns) = header.as_ref() else {
            continue;
        };

        let values = split_csv(line);
        if values.len() != columns.len() {
            continue;
        }
        let row: HashMap<&str, &str> = columns
            .iter()
            .map(String::as_str)
            .zip(values.iter().map(String::as_str))
            .collect();

        let pxname = row.get("pxname").copied().unwrap_or_default();
        let svname = row.get("svname").copied().unwrap_or_default();
        if svname.is_empty()
            || svname.eq_ignore_ascii_case("BACKEND")
            || svname.eq_ignore_ascii_case("FRONTEND")
        {
            continue;
        }
        if backend.is_some_and(|b| b != pxname) {
            continue;
        }

        let field = |name: &str| row.get(name).copied().unwrap_or_default().to_string();
        let check_status = row
            .get("check_status")
            .or_else(|| row.get("check_code"))
            .copied()
            .unwrap_or_default()
            .to_string();

        stats.push(ServerStat {
            backend: pxname.to_string(),
            server: svname.to_string(),
            status: field("status"),
            check_status,
            last_check: field("last_chk"),
            last_change: row.get("lastchg").and_then(|v| v.parse().ok()),
        });
    }

    stats
}

/// Split one CSV record, honouring double-quoted fields.
fn split_csv(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# pxname,svname,status,lastchg,check_status,last_chk,
stats,FRONTEND,OPEN,,,,
web_back,web1,UP,120,L7OK,HTTP status check returned code <200>,
web_back,web2,DOWN,5,L4CON,\"Connection refused, at step 1\",
web_back,BACKEND,UP,120,,,
mysql_back,db1,UP,3600,L4OK,,
mysql_back,broken,UP
";

    #[test]
    fn keeps_only_server_rows() {
        let stats = parse_show_stat(SAMPLE, None);
        let names: Vec<_> = stats.iter().map(|s| s.server.as_str()).collect();
        assert_eq!(names, ["web1", "web2", "db1"]);
    }

    #[test]
    fn filters_by_backend() {
        let stats = parse_show_stat(SAMPLE, Some("web_back"));
        assert_eq!(stats.len(), 2);
        assert_eq!(
            stats[1],
            ServerStat {
                backend: "web_back".into(),
                server: "web2".into(),
                status: "DOWN".into(),
                check_status: "L4CON".into(),
                last_check: "Connection refused, at step 1".into(),
                last_change: Some(5),
            }
        );
    }

    #[test]
    fn check_code_is_fallback_for_check_status() {
        let out = "# pxname,svname,status,check_code\nweb_back,web1,UP,200\n";
        assert_eq!(parse_show_stat(out, None)[0].check_status, "200");
    }

    #[test]
    fn rows_before_header_are_ignored() {
        assert!(parse_show_stat("web_back,web1,UP\n", None).is_empty());
        assert!(parse_show_stat("", None).is_empty());
    }

    #[test]
    fn csv_handles_escaped_quotes() {
        assert_eq!(split_csv(r#"a,"b ""c"", d",e"#), ["a", r#"b "c", d"#, "e"]);
        assert_eq!(split_csv("a,,"), ["a", "", ""]);
    }
}
