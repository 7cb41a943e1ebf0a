use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    str::FromStr,
};

use clap::{Args, Parser, Subcommand};
use url::Url;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the metadata of a DOI and render it
    Fetch {
        #[arg(value_name = "DOI")]
        doi: String,
        #[command(flatten)]
        output: OutputArgs,
        /// DOI resolver to query
        #[arg(long, value_name = "URL", default_value = "https://doi.org/")]
        resolver: Url,
        /// Give up on the resolver after this many seconds
        #[arg(long, value_name = "SECS", default_value_t = 10)]
        timeout: u64,
    },
    /// Render previously fetched metadata
    Render {
        #[arg(value_name = "FILE")]
        input: Input,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Document whose `[[Name^id]]` references replace matching authors and journals
    #[arg(long, value_name = "FILE")]
    pub links: Option<Input>,
    /// Print the normalized record as JSON instead of the outline
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where to read a document from: `-` for standard input, anything else is a path.
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn read_to_string(&self) -> io::Result<String> {
        match self {
            Input::Stdin => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
            Input::File(path) => fs::read_to_string(path),
        }
    }
}

impl FromStr for Input {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Input::Stdin)
        } else {
            Ok(Input::File(PathBuf::from(s)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::NamedTempFile;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dash_is_stdin() {
        assert_eq!(Input::from_str("-").unwrap(), Input::Stdin);
    }

    #[test]
    fn file_input_reads_contents() {
        let tmp = NamedTempFile::new().expect("tmp file");
        std::fs::write(tmp.path(), "[[A B^x]]").unwrap();
        let input = Input::from_str(tmp.path().to_str().unwrap()).expect("parse");
        assert_eq!(input.read_to_string().unwrap(), "[[A B^x]]");
    }

    #[test]
    fn anything_else_is_a_path() {
        proptest::proptest!(|(s in "[A-Za-z0-9._][A-Za-z0-9._-]{0,31}")| {
            let input = Input::from_str(&s).expect("parse");
            proptest::prop_assert_eq!(input, Input::File(PathBuf::from(&s)));
        })
    }

    #[test]
    fn fetch_defaults() {
        let cli = Cli::try_parse_from(["tana-doi", "fetch", "10.1000/182"]).unwrap();
        match cli.command {
            Command::Fetch {
                doi,
                output,
                resolver,
                timeout,
            } => {
                assert_eq!(doi, "10.1000/182");
                assert_eq!(output.links, None);
                assert!(!output.json);
                assert_eq!(resolver.as_str(), "https://doi.org/");
                assert_eq!(timeout, 10);
            }
            _ => panic!("expected fetch"),
        }
    }
}
