//! Command-line configuration and its validation. Nothing here touches the network.

use std::{
    net::{SocketAddr, ToSocketAddrs},
    path::{Path, PathBuf},
};

use clap::Parser;

use crate::error::StartupError;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Serve a directory over HTTP, matching request paths case-insensitively."
)]
pub struct Args {
    #[arg(short, long, default_value = ":8000", help = "Address to serve on.")]
    pub address: String,

    #[arg(
        short,
        long,
        default_value_t = 128,
        help = "Number of directory listings cached, disabled=0."
    )]
    pub cache_size: usize,

    #[arg(short, long, help = "Only log failed requests.")]
    pub quiet: bool,

    #[arg(default_value = ".", help = "Directory to serve.")]
    pub root: PathBuf,
}

/// Validated settings the server runs with.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path of the served directory.
    pub root: PathBuf,
    pub address: SocketAddr,
    pub cache_size: usize,
    pub quiet: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, StartupError> {
        Ok(Self {
            root: validate_root(&args.root)?,
            address: parse_listen_address(&args.address)?,
            cache_size: args.cache_size,
            quiet: args.quiet,
        })
    }
}

/// Check that `root` exists and is a directory, and return it made absolute.
pub fn validate_root(root: &Path) -> Result<PathBuf, StartupError> {
    let missing = |source| StartupError::RootMissing {
        path: root.to_path_buf(),
        source,
    };

    let meta = std::fs::metadata(root).map_err(missing)?;
    if !meta.is_dir() {
        return Err(StartupError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }
    std::fs::canonicalize(root).map_err(missing)
}

/// Parse a listen address. A bare `:PORT` listens on every interface.
pub fn parse_listen_address(addr: &str) -> Result<SocketAddr, StartupError> {
    let full = match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => addr.to_string(),
    };

    if let Ok(parsed) = full.parse() {
        return Ok(parsed);
    }
    // Hostnames such as `localhost:8000`.
    full.to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| StartupError::InvalidAddress(addr.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["caseless_host"]).unwrap();
        assert_eq!(args.address, ":8000");
        assert_eq!(args.cache_size, 128);
        assert!(!args.quiet);
        assert_eq!(args.root, PathBuf::from("."));
    }

    #[test]
    fn flags_and_root() {
        let args = Args::try_parse_from([
            "caseless_host",
            "--address",
            "127.0.0.1:9000",
            "--cache-size",
            "0",
            "--quiet",
            "/srv/www",
        ])
        .unwrap();
        assert_eq!(args.address, "127.0.0.1:9000");
        assert_eq!(args.cache_size, 0);
        assert!(args.quiet);
        assert_eq!(args.root, PathBuf::from("/srv/www"));
    }

    #[test]
    fn negative_cache_size_is_rejected() {
        assert!(Args::try_parse_from(["caseless_host", "--cache-size", "-1"]).is_err());
    }

    #[test]
    fn bare_port_listens_everywhere() {
        let addr = parse_listen_address(":8000").unwrap();
        assert_eq!(addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn explicit_addresses() {
        assert_eq!(
            parse_listen_address("127.0.0.1:1234").unwrap(),
            "127.0.0.1:1234".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(parse_listen_address("[::1]:80").unwrap().port(), 80);
        assert!(matches!(
            parse_listen_address("not an address"),
            Err(StartupError::InvalidAddress(_))
        ));
    }

    #[test]
    fn root_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let err = validate_root(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, StartupError::RootMissing { .. }));
    }

    #[test]
    fn root_must_be_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let err = validate_root(&file).unwrap_err();
        assert!(matches!(err, StartupError::RootNotDirectory { .. }));
    }

    #[test]
    fn root_is_made_absolute() {
        let tmp = tempfile::tempdir().unwrap();
        let root = validate_root(tmp.path()).unwrap();
        assert!(root.is_absolute());
        assert!(root.is_dir());
    }
}
