//! Command-line surface.
//!
//! Squawk's historical flags are colon-attached (`-Xmx:4m`), a shape `clap` does not parse
//! natively. [`rewrite_colon_flags`] translates each recognized token into `--name=value` form
//! before [`Cli::parse_from`] ever sees it, so the derive macro still does the real parsing and
//! validation; only the token shape is massaged.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "squawk", about = "Squawk embedded Java virtual machine")]
pub struct Cli {
    /// `-Xmx:<k>`: heap size, e.g. `4m`, `512k`.
    #[arg(long = "xmx", value_name = "SIZE")]
    pub xmx: Option<String>,

    /// `-Xmxnvm:<k>`: non-volatile (hibernate save area) memory size.
    #[arg(long = "xmxnvm", value_name = "SIZE")]
    pub xmxnvm: Option<String>,

    /// `-Xboot:<path>`: path to the bootstrap suite or classpath root.
    #[arg(long = "xboot", value_name = "PATH")]
    pub xboot: Option<PathBuf>,

    /// `-Xioport:<port>`: run the split I/O server on this TCP port instead of servicing
    /// channel calls inline.
    #[arg(long = "xioport", value_name = "PORT")]
    pub xioport: Option<u16>,

    /// `-suite:<name>`: the suite to load and run.
    #[arg(long = "suite", value_name = "NAME")]
    pub suite: Option<String>,

    /// `-cp:<paths>`: classpath entries, separated by the platform path separator (`:` on Unix,
    /// `;` on Windows).
    #[arg(long = "cp", value_name = "PATHS")]
    pub classpath: Option<String>,

    /// `-verbose`: raise the default trace level.
    #[arg(long = "verbose")]
    pub verbose: bool,

    /// `-Xtgc:<mask>`: GC trace mask.
    #[arg(long = "xtgc", value_name = "MASK")]
    pub xtgc: Option<String>,

    /// The class to run, when not using `-suite`.
    pub main_class: Option<String>,

    /// Arguments passed through to the running program's `main`.
    pub program_args: Vec<String>,
}

/// Recognized colon-flag prefixes, longest/most-specific first so e.g. `-Xmxnvm:` is matched
/// before `-Xmx:`.
const COLON_FLAGS: &[(&str, &str)] = &[
    ("-Xmxnvm:", "--xmxnvm="),
    ("-Xmx:", "--xmx="),
    ("-Xboot:", "--xboot="),
    ("-Xioport:", "--xioport="),
    ("-suite:", "--suite="),
    ("-cp:", "--cp="),
    ("-Xtgc:", "--xtgc="),
];

/// Rewrites `-Xmx:4m`-shaped tokens into `--xmx=4m`-shaped ones, and the bare `-verbose` switch
/// into `--verbose`. Tokens matching neither are passed through unchanged (the main class name
/// and its program args).
pub fn rewrite_colon_flags(raw: impl Iterator<Item = String>) -> Vec<String> {
    raw.map(|token| {
        if token == "-verbose" {
            return "--verbose".to_string();
        }
        for (prefix, replacement) in COLON_FLAGS {
            if let Some(value) = token.strip_prefix(prefix) {
                return format!("{replacement}{value}");
            }
        }
        token
    })
    .collect()
}

/// Parses a size like `4m`, `512k`, or a bare byte count into bytes.
pub fn parse_size(text: &str) -> Result<u64> {
    let text = text.trim();
    let (digits, multiplier) = match text.chars().last() {
        Some('k') | Some('K') => (&text[..text.len() - 1], 1024),
        Some('m') | Some('M') => (&text[..text.len() - 1], 1024 * 1024),
        _ => (text, 1),
    };
    let value: u64 = digits
        .parse()
        .map_err(|_| anyhow!("invalid size '{text}'"))?;
    Ok(value * multiplier)
}

/// Splits a `-cp:`-style classpath string on the platform path separator.
pub fn split_classpath(raw: &str) -> Vec<PathBuf> {
    let separator = if cfg!(windows) { ';' } else { ':' };
    raw.split(separator)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_flags_become_long_equals_flags() {
        let rewritten = rewrite_colon_flags(
            vec!["-Xmx:4m".to_string(), "-verbose".to_string(), "HelloWorld".to_string()]
                .into_iter(),
        );
        assert_eq!(rewritten, vec!["--xmx=4m", "--verbose", "HelloWorld"]);
    }

    #[test]
    fn xmxnvm_is_not_shadowed_by_the_shorter_xmx_prefix() {
        let rewritten = rewrite_colon_flags(vec!["-Xmxnvm:64k".to_string()].into_iter());
        assert_eq!(rewritten, vec!["--xmxnvm=64k"]);
    }

    #[test]
    fn parse_size_understands_k_and_m_suffixes() {
        assert_eq!(parse_size("512").unwrap(), 512);
        assert_eq!(parse_size("4k").unwrap(), 4096);
        assert_eq!(parse_size("2M").unwrap(), 2 * 1024 * 1024);
    }

    #[test]
    fn parse_size_rejects_garbage() {
        assert!(parse_size("lots").is_err());
    }

    #[test]
    fn classpath_splits_on_platform_separator() {
        let separator = if cfg!(windows) { ";" } else { ":" };
        let raw = format!("a{separator}b{separator}{separator}c");
        let entries = split_classpath(&raw);
        assert_eq!(entries, vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]);
    }
}
