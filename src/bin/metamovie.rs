use anyhow::Context;
use clap::Parser;
use metamovie::{Metadata, MovieHeader, Mp4File, epoch::parse_timestamp};
use serde::Serialize;
use std::path::PathBuf;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Parser, Debug)]
#[command(version, about = "Show or change MP4/QuickTime creation and modification times")]
struct Args {
    /// MP4/QuickTime file path
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Write the patched file here instead of modifying the input
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Set both creation and modification time
    #[arg(short = 't', long = "time", value_parser = parse_time)]
    time: Option<OffsetDateTime>,

    /// Set the creation time (overrides -t)
    #[arg(long = "tc", value_parser = parse_time)]
    created: Option<OffsetDateTime>,

    /// Set the modification time (overrides -t)
    #[arg(long = "tm", value_parser = parse_time)]
    modified: Option<OffsetDateTime>,

    /// Output as JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn wants_update(&self) -> bool {
        self.time.is_some() || self.created.is_some() || self.modified.is_some()
    }

    /// Apply the requested times on top of `current`.
    fn apply(&self, current: Metadata) -> Metadata {
        Metadata {
            created: self.created.or(self.time).unwrap_or(current.created),
            modified: self.modified.or(self.time).unwrap_or(current.modified),
        }
    }
}

fn parse_time(s: &str) -> Result<OffsetDateTime, String> {
    parse_timestamp(s).map_err(|e| format!("{e} (expected RFC 3339 or \"YYYY-MM-DD HH:MM:SS\")"))
}

#[derive(Debug, Serialize)]
struct MovieInfo<'a> {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_to: Option<String>,
    metadata: Metadata,
    movie_header: &'a MovieHeader,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut file = Mp4File::open(&args.input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    let mut written_to = None;
    if args.wants_update() {
        file.set_metadata(args.apply(file.metadata()));
        let target = args.output.clone().unwrap_or_else(|| args.input.clone());
        file.write_to(&target)
            .with_context(|| format!("failed to write {}", target.display()))?;
        written_to = Some(target.display().to_string());
    }

    let info = MovieInfo {
        file: args.input.display().to_string(),
        written_to,
        metadata: file.metadata(),
        movie_header: file.movie_header(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_human(&info)?;
    }
    Ok(())
}

// ---- human-readable output -----------------------------------------

fn print_human(info: &MovieInfo) -> anyhow::Result<()> {
    println!("File: {}", info.file);
    if let Some(out) = &info.written_to {
        println!("Written to: {}", out);
    }
    println!("Created: {}", info.metadata.created.format(&Rfc3339)?);
    println!("Modified: {}", info.metadata.modified.format(&Rfc3339)?);

    let h = info.movie_header;
    match h.duration_seconds() {
        Some(sec) => println!("Duration: {} ticks @ {} -> {:.3} s", h.duration, h.time_scale, sec),
        None => println!("Duration: {} ticks (no time scale)", h.duration),
    }
    println!("Rate: {:.3}  Volume: {:.3}", h.preferred_rate.to_f64(), h.preferred_volume.to_f64());
    if !h.matrix.is_identity() {
        println!(
            "Matrix: a={:.3} b={:.3} c={:.3} d={:.3} x={:.3} y={:.3}",
            h.matrix.a().to_f64(),
            h.matrix.b().to_f64(),
            h.matrix.c().to_f64(),
            h.matrix.d().to_f64(),
            h.matrix.x().to_f64(),
            h.matrix.y().to_f64()
        );
    }
    println!("Next track id: {}", h.next_track_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["metamovie", "-i", "in.mp4"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn current() -> Metadata {
        Metadata {
            created: datetime!(2001-01-01 0:00 UTC),
            modified: datetime!(2002-02-02 0:00 UTC),
        }
    }

    #[test]
    fn no_time_flags_means_read_only() {
        let a = args(&[]);
        assert!(!a.wants_update());
        assert_eq!(a.apply(current()), current());
    }

    #[test]
    fn time_sets_both() {
        let a = args(&["-t", "2020-05-06 07:08:09"]);
        let m = a.apply(current());
        assert_eq!(m.created, datetime!(2020-05-06 7:08:09 UTC));
        assert_eq!(m.modified, datetime!(2020-05-06 7:08:09 UTC));
    }

    #[test]
    fn specific_flags_override_time() {
        let a = args(&["-t", "2020-05-06T07:08:09Z", "--tm", "2021-01-01 00:00:00"]);
        let m = a.apply(current());
        assert_eq!(m.created, datetime!(2020-05-06 7:08:09 UTC));
        assert_eq!(m.modified, datetime!(2021-01-01 0:00 UTC));
    }

    #[test]
    fn bad_time_is_a_usage_error() {
        let res = Args::try_parse_from(["metamovie", "-i", "in.mp4", "--tc", "soon"]);
        assert!(res.is_err());
    }
}
