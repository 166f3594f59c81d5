//! Argument structures and operation parsing for the `snmpv1` tool.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::endpoint::Endpoint;
use crate::executor::ExecutionMode;
use crate::mib::parse_object;
use crate::oid::Oid;
use crate::operation::Operation;
use crate::value::Value;
use crate::varbind::VarBind;

/// Execution mode for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// All operations in flight at once.
    Concurrent,
    /// One operation after another (default).
    #[default]
    Sequential,
}

impl From<Mode> for ExecutionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Concurrent => ExecutionMode::Concurrent,
            Mode::Sequential => ExecutionMode::Sequential,
        }
    }
}

/// Run SNMPv1 GET and SET operations against one agent.
#[derive(Debug, Parser)]
#[command(name = "snmpv1", version, about)]
pub struct Args {
    /// Target host or host:port (default port 161).
    #[arg(value_name = "TARGET", value_parser = parse_endpoint)]
    pub target: Endpoint,

    /// Operations: get:OBJECT[,OBJECT...] or set:OBJECT=TYPE:VALUE.
    #[arg(required = true, value_name = "OP", value_parser = parse_operation)]
    pub operations: Vec<Operation>,

    /// How to run the operations.
    #[arg(short = 'm', long = "mode", default_value = "sequential")]
    pub mode: Mode,

    /// Community string.
    #[arg(short = 'c', long = "community", default_value = "public")]
    pub community: String,

    /// Request timeout in seconds.
    #[arg(short = 't', long = "timeout", default_value = "5", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Retries after a timed-out request.
    #[arg(short = 'r', long = "retries", default_value = "0")]
    pub retries: u32,

    /// Enable debug logging (snmpv1_manager=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (snmpv1_manager=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl Args {
    /// Initialize tracing based on debug/trace flags.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "snmpv1_manager=trace"
        } else if self.debug {
            "snmpv1_manager=debug"
        } else {
            "snmpv1_manager=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Set-specific type specifier for values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Unsigned,
    String,
    Oid,
    IpAddress,
    TimeTicks,
    Counter32,
}

impl std::str::FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i" => Ok(ValueType::Integer),
            "u" => Ok(ValueType::Unsigned),
            "s" => Ok(ValueType::String),
            "o" => Ok(ValueType::Oid),
            "a" => Ok(ValueType::IpAddress),
            "t" => Ok(ValueType::TimeTicks),
            "c" => Ok(ValueType::Counter32),
            _ => Err(format!("invalid type specifier: {}", s)),
        }
    }
}

impl ValueType {
    /// Parse a string value into a [`Value`] according to the type specifier.
    pub fn parse_value(&self, s: &str) -> Result<Value, String> {
        fn unsigned(s: &str, what: &str) -> Result<u32, String> {
            s.parse().map_err(|_| format!("invalid {} value: {}", what, s))
        }

        match self {
            ValueType::Integer => s
                .parse()
                .map(Value::Integer)
                .map_err(|_| format!("invalid integer value: {}", s)),
            ValueType::Unsigned => unsigned(s, "unsigned").map(Value::Gauge32),
            ValueType::String => Ok(Value::from(s)),
            ValueType::Oid => parse_object(s)
                .map(Value::ObjectIdentifier)
                .map_err(|e| format!("invalid OID value: {}", e)),
            ValueType::IpAddress => s
                .parse::<std::net::Ipv4Addr>()
                .map(Value::from)
                .map_err(|_| format!("invalid IP address: {}", s)),
            ValueType::TimeTicks => unsigned(s, "timeticks").map(Value::TimeTicks),
            ValueType::Counter32 => unsigned(s, "counter32").map(Value::Counter32),
        }
    }
}

fn parse_endpoint(s: &str) -> Result<Endpoint, String> {
    s.parse().map_err(|e| format!("invalid target '{}': {}", s, e))
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("invalid timeout: {}", s))?;
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| format!("timeout must be a positive number of seconds: {}", s))
}

/// Parse one `get:` or `set:` operation word.
pub fn parse_operation(s: &str) -> Result<Operation, String> {
    let (kind, body) = s
        .split_once(':')
        .ok_or_else(|| format!("expected get:... or set:..., got '{}'", s))?;

    match kind {
        "get" => {
            let oids = body
                .split(',')
                .map(|name| parse_object(name).map_err(|e| e.to_string()))
                .collect::<Result<Vec<Oid>, String>>()?;
            Operation::get(oids).map_err(|e| e.to_string())
        }
        "set" => {
            let (name, typed) = body
                .split_once('=')
                .ok_or_else(|| format!("expected set:OBJECT=TYPE:VALUE, got '{}'", s))?;
            let (ty, value) = typed
                .split_once(':')
                .ok_or_else(|| format!("expected TYPE:VALUE, got '{}'", typed))?;
            let oid = parse_object(name).map_err(|e| e.to_string())?;
            let value = ty.parse::<ValueType>()?.parse_value(value)?;
            Operation::set([VarBind::new(oid, value)]).map_err(|e| e.to_string())
        }
        _ => Err(format!("unknown operation '{}'", kind)),
    }
}
