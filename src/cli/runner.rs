//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, FetchArgs, OutputFormat, RequestArgs};
use crate::config::{LocalConfig, AUTHORIZATION_KEY, URL_KEY};
use crate::error::{Error, Result, ResultExt};
use crate::fs::is_file;
use crate::graphql::{GraphqlClient, Page, PaginationRequest};
use crate::rows::{ensure_parent_dir, write_record};
use crate::template::render_payload;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
    config_dir: Option<PathBuf>,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            config_dir: None,
        }
    }

    /// Read the local config under `dir` instead of the home directory
    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch(args) => self.fetch(args).await,
            Commands::Render { request, offset } => self.render(request, *offset),
        }
    }

    async fn fetch(&self, args: &FetchArgs) -> Result<()> {
        let request = load_request(&args.request)?;

        let mut local: Option<LocalConfig> = None;
        let url = match &args.url {
            Some(url) => url.clone(),
            None => self
                .local_config(&mut local)?
                .get_string_or_empty(URL_KEY)
                .to_string(),
        };
        if url.is_empty() {
            return Err(Error::config(format!(
                "no endpoint: pass --url or set `{URL_KEY}` in the local config"
            )));
        }
        let authorization = match &args.authorization {
            Some(auth) => auth.clone(),
            None => self
                .local_config(&mut local)?
                .get_string_or_empty(AUTHORIZATION_KEY)
                .to_string(),
        };

        let client = GraphqlClient::builder(url)
            .authorization(authorization)
            .timeout(Duration::from_secs(args.timeout))
            .build()?;

        let out = open_output(args.output.as_deref())?;
        let mut sink = match args.format {
            OutputFormat::Json => Sink::Lines(out),
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(out);
                write_record(&mut writer, &args.columns)?;
                Sink::Csv {
                    writer,
                    columns: args.columns.clone(),
                }
            }
        };

        let mut written = 0usize;
        let state = client
            .paginate(&request, |page| {
                written += sink.write_page(page)?;
                Ok(())
            })
            .await?;
        sink.flush()?;

        info!(
            "wrote {} records ({} of {} fetched in {} pages)",
            written, state.fetched, state.total, state.pages
        );
        Ok(())
    }

    fn render(&self, args: &RequestArgs, offset: i64) -> Result<()> {
        println!("{}", render_request(args, offset)?);
        Ok(())
    }

    /// Load the local config on first use
    fn local_config<'a>(&self, slot: &'a mut Option<LocalConfig>) -> Result<&'a LocalConfig> {
        if slot.is_none() {
            let config = match &self.config_dir {
                Some(dir) => LocalConfig::load(dir)?,
                None => LocalConfig::load_default()?,
            };
            *slot = Some(config);
        }
        slot.as_ref()
            .ok_or_else(|| Error::config("local config not loaded"))
    }
}

/// Payload sent for the page at `offset`
fn render_request(args: &RequestArgs, offset: i64) -> Result<String> {
    let request = load_request(args)?;
    Ok(render_payload(&request.graphql, &request.vars(offset)))
}

/// Read the request file and apply command-line overrides
fn load_request(args: &RequestArgs) -> Result<PaginationRequest> {
    if !is_file(&args.request) {
        return Err(Error::config(format!(
            "request file not found: {}",
            args.request.display()
        )));
    }

    let mut request = PaginationRequest::from_file(&args.request)
        .with_context(|| format!("cannot load request {}", args.request.display()))?;

    if let Some(limit) = args.limit {
        request.limit = limit;
    }
    if let Some(max) = args.max {
        request.max = max;
    }
    if let Some(pages) = args.max_pages {
        request.max_pages = Some(pages);
    }
    if let Some(minutes) = args.last_minutes {
        request.set_last(Duration::from_secs(minutes * 60));
    }
    if let Some(ref start) = args.start_time {
        request.start_time = Some(start.clone());
    }
    if let Some(ref end) = args.end_time {
        request.end_time = Some(end.clone());
    }
    Ok(request)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            ensure_parent_dir(path)?;
            let file = File::create(path)
                .with_context(|| format!("cannot open the file [{}]", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Destination for fetched results
enum Sink {
    Lines(Box<dyn Write>),
    Csv {
        writer: csv::Writer<Box<dyn Write>>,
        columns: Vec<String>,
    },
}

impl Sink {
    fn write_page(&mut self, page: &Page<'_>) -> Result<usize> {
        match self {
            Sink::Lines(out) => {
                for item in page.results() {
                    serde_json::to_writer(&mut *out, item)?;
                    out.write_all(b"\n")?;
                }
            }
            Sink::Csv { writer, columns } => {
                for item in page.results() {
                    write_record(writer, columns.iter().map(|c| cell(item, c)))?;
                }
            }
        }
        Ok(page.len())
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            Sink::Lines(out) => out.flush()?,
            Sink::Csv { writer, .. } => writer.flush()?,
        }
        Ok(())
    }
}

/// Text of a top-level field for a CSV cell
fn cell(item: &Value, column: &str) -> String {
    match item.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
