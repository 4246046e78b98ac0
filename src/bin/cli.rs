//! MeshKV CLI Client
//!
//! One-shot client for a MeshKV cluster. Connects to any node and follows
//! `ERR_REDIRECT` responses to the owning node, resending the command.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;

use clap::{Parser, Subcommand};
use meshkv::{MeshError, Result};

/// Give up after this many redirect hops; a correct cluster needs one
const MAX_REDIRECTS: usize = 4;

/// MeshKV CLI
#[derive(Parser, Debug)]
#[command(name = "meshkv-cli")]
#[command(about = "CLI for the MeshKV cache cluster")]
struct Args {
    /// Any cluster node address
    #[arg(short, long, default_value = "127.0.0.1:9000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get { key: String },

    /// Get only the version of a key
    Getm { key: String },

    /// Set a key to a value
    Set {
        key: String,
        value: String,

        /// TTL in seconds (0 = never expires)
        #[arg(short, long, default_value = "0")]
        ttl: u64,
    },

    /// Compare-and-swap: set only if the version matches
    Cas {
        key: String,
        version: u64,
        value: String,

        /// TTL in seconds (0 = never expires)
        #[arg(short, long, default_value = "0")]
        ttl: u64,
    },

    /// Delete a key
    Del { key: String },
}

impl Commands {
    /// Serialize to the wire command
    fn to_wire(&self) -> Vec<u8> {
        match self {
            Commands::Get { key } => format!("get {}\r\n", key).into_bytes(),
            Commands::Getm { key } => format!("getm {}\r\n", key).into_bytes(),
            Commands::Set { key, value, ttl } => {
                format!("set {} {} {}\r\n{}\r\n", key, ttl, value.len(), value).into_bytes()
            }
            Commands::Cas {
                key,
                version,
                value,
                ttl,
            } => format!(
                "cas {} {} {} {}\r\n{}\r\n",
                key, ttl, version, value.len(), value
            )
            .into_bytes(),
            Commands::Del { key } => format!("delete {}\r\n", key).into_bytes(),
        }
    }

    /// Whether a success response carries a payload line (`get` only)
    fn expects_payload(&self) -> bool {
        matches!(self, Commands::Get { .. })
    }
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Send the command, following redirects to the owning node
fn run(args: &Args) -> Result<String> {
    let wire = args.command.to_wire();
    let mut addr = args.server.clone();

    for _ in 0..MAX_REDIRECTS {
        let mut stream = BufReader::new(TcpStream::connect(&addr)?);
        stream.get_mut().write_all(&wire)?;

        let header = read_line(&mut stream)?;
        let tokens: Vec<&str> = header.split_whitespace().collect();

        // Redirected: reconnect to the named owner and resend
        if let ["ERR_REDIRECT", host, port] = tokens.as_slice() {
            addr = format!("{}:{}", host, port);
            continue;
        }

        // get success carries a payload line after the header
        if args.command.expects_payload() {
            if let ["VALUE", bytes] = tokens.as_slice() {
                let len: usize = bytes
                    .parse()
                    .map_err(|_| MeshError::Protocol(format!("bad VALUE header: {}", header)))?;
                let payload = read_payload(&mut stream, len)?;
                return Ok(String::from_utf8_lossy(&payload).into_owned());
            }
        }

        return Ok(header);
    }

    Err(MeshError::Network(format!(
        "gave up after {} redirects",
        MAX_REDIRECTS
    )))
}

/// Read one `\r\n`-terminated line, terminator stripped
fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Read an exact-length payload plus its trailing `\r\n`
fn read_payload<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut payload = vec![0u8; len + 2];
    reader.read_exact(&mut payload)?;
    payload.truncate(len);
    Ok(payload)
}
