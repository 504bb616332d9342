//! `hookwatch-signature` - generates signatures for testing webhook
//! requests against a running Hookwatch server.
//!
//! ```text
//! hookwatch-signature <provider> [payload] [--file <path>] [--secret <secret>]
//! ```
//!
//! The secret may also be supplied via `HOOKWATCH_SECRET`. When neither
//! a payload argument nor `--file` is given, the payload is read from
//! stdin.

use std::io::Read;

use hookwatch_core::{sign, Provider};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(message) = run(args) {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    provider: String,
    payload: Option<String>,
    file: Option<String>,
    secret: Option<String>,
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    let mut iter = args.into_iter();
    let provider = iter
        .next()
        .ok_or("usage: hookwatch-signature <provider> [payload] [--file <path>] [--secret <secret>]")?;

    let mut payload = None;
    let mut file = None;
    let mut secret = None;

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--file" => {
                file = Some(iter.next().ok_or("--file requires a path")?);
            }
            "--secret" => {
                secret = Some(iter.next().ok_or("--secret requires a value")?);
            }
            _ if payload.is_none() => payload = Some(arg),
            other => return Err(format!("unexpected argument: {other}")),
        }
    }

    Ok(Args {
        provider,
        payload,
        file,
        secret,
    })
}

fn run(args: Vec<String>) -> Result<(), String> {
    let args = parse_args(args)?;

    let provider = Provider::from_slug(&args.provider).map_err(|e| e.to_string())?;

    let secret = args
        .secret
        .clone()
        .or_else(|| std::env::var("HOOKWATCH_SECRET").ok())
        .ok_or("no secret provided; use --secret or set HOOKWATCH_SECRET")?;

    let payload = read_payload(&args)?;
    if payload.trim().is_empty() {
        return Err("no payload provided; use the payload argument, --file, or stdin".to_string());
    }

    serde_json::from_str::<serde_json::Value>(&payload)
        .map_err(|e| format!("invalid JSON payload: {e}"))?;

    let signature = sign(provider, payload.as_bytes(), &secret);

    println!("Provider:     {provider}");
    println!("Header name:  {}", provider.signature_header());
    println!();
    println!("Signature:");
    println!("{signature}");
    println!();
    match provider {
        Provider::Gitlab => {
            // The receiving side compares the raw shared token, not this
            // digest; send the token itself in X-Gitlab-Token.
            println!("Note: the server expects the shared token in X-Gitlab-Token.");
        }
        _ => {
            println!("Copy the signature above into your request header.");
        }
    }

    Ok(())
}

fn read_payload(args: &Args) -> Result<String, String> {
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"));
    }

    if let Some(payload) = &args.payload {
        return Ok(payload.clone());
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("cannot read stdin: {e}"))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_positional_payload() {
        let parsed = parse_args(args(&["github", "{\"a\":1}"])).unwrap();
        assert_eq!(parsed.provider, "github");
        assert_eq!(parsed.payload.as_deref(), Some("{\"a\":1}"));
        assert!(parsed.file.is_none());
        assert!(parsed.secret.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let parsed = parse_args(args(&["stripe", "--file", "payload.json", "--secret", "sk"])).unwrap();
        assert_eq!(parsed.file.as_deref(), Some("payload.json"));
        assert_eq!(parsed.secret.as_deref(), Some("sk"));
    }

    #[test]
    fn test_parse_rejects_missing_provider() {
        assert!(parse_args(Vec::new()).is_err());
    }

    #[test]
    fn test_parse_rejects_extra_positional() {
        assert!(parse_args(args(&["github", "one", "two"])).is_err());
    }

    #[test]
    fn test_parse_rejects_dangling_flag() {
        assert!(parse_args(args(&["github", "--secret"])).is_err());
    }
}
