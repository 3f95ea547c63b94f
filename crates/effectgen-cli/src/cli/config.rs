use anyhow::{Context, bail};
use clap::Parser;
use core::time::Duration;
use effectgen::{
    Config, DEFAULT_API_ORIGIN, DEFAULT_CONTENT_ORIGIN, EffectConfig, Endpoints, MAX_POLLS,
    PollConfig,
};
use std::path::{Path, PathBuf};
use url::Url;

/// Runtime configuration for the `effectgen-cli` binary.
///
/// Every value can come from a flag or from the environment (including a
/// `.env` file). The account id has no default: jobs are always submitted on
/// behalf of someone.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "effectgen-cli",
    version,
    about = "Upload an image, apply a remote effect and fetch the result"
)]
pub struct CliArgs {
    /// Image to upload.
    ///
    /// Environment variable: `EFFECT_FILE`
    #[arg(long, env = "EFFECT_FILE")]
    pub file: PathBuf,

    /// Content type sent with the upload. Guessed from the file extension when
    /// omitted.
    ///
    /// Environment variable: `EFFECT_MIME_TYPE`
    #[arg(long, env = "EFFECT_MIME_TYPE")]
    pub mime_type: Option<String>,

    /// Account the job is submitted and polled under.
    ///
    /// Environment variable: `EFFECT_USER_ID`
    #[arg(long, env = "EFFECT_USER_ID")]
    pub user_id: String,

    /// Effect to apply.
    ///
    /// Environment variable: `EFFECT_ID`
    #[arg(long, env = "EFFECT_ID", default_value_t = String::from("mugshot"))]
    pub effect_id: String,

    /// Model for image jobs. Video jobs always use the video model.
    ///
    /// Environment variable: `EFFECT_MODEL`
    #[arg(long, env = "EFFECT_MODEL", default_value_t = String::from("image-effects"))]
    pub model: String,

    /// Tool type for image jobs.
    ///
    /// Environment variable: `EFFECT_TOOL_TYPE`
    #[arg(long, env = "EFFECT_TOOL_TYPE", default_value_t = String::from("image-effects"))]
    pub tool_type: String,

    /// Produce a video instead of an image.
    ///
    /// Environment variable: `EFFECT_IS_VIDEO`
    #[arg(long, env = "EFFECT_IS_VIDEO", default_value_t = false)]
    pub video: bool,

    /// Ask the service to keep its watermark on the result.
    ///
    /// Environment variable: `EFFECT_KEEP_WATERMARK`
    #[arg(long, env = "EFFECT_KEEP_WATERMARK", default_value_t = false)]
    pub keep_watermark: bool,

    /// Publish the result instead of keeping it private.
    ///
    /// Environment variable: `EFFECT_PUBLIC`
    #[arg(long, env = "EFFECT_PUBLIC", default_value_t = false)]
    pub public: bool,

    /// Origin of the job and upload-URL API.
    ///
    /// Environment variable: `API_ORIGIN`
    #[arg(long, env = "API_ORIGIN", default_value_t = String::from(DEFAULT_API_ORIGIN))]
    pub api_origin: String,

    /// Origin uploaded files are served from.
    ///
    /// Environment variable: `CONTENT_ORIGIN`
    #[arg(long, env = "CONTENT_ORIGIN", default_value_t = String::from(DEFAULT_CONTENT_ORIGIN))]
    pub content_origin: String,

    /// Delay between two status requests, in milliseconds.
    ///
    /// Environment variable: `POLL_INTERVAL_MS`
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 2000)]
    pub poll_interval_ms: u64,

    /// Status requests made before the job is considered timed out.
    ///
    /// Environment variable: `MAX_POLLS`
    #[arg(long, env = "MAX_POLLS", default_value_t = MAX_POLLS)]
    pub max_polls: u32,

    /// Directory the result is saved to. Nothing is saved when omitted.
    ///
    /// Environment variable: `OUTPUT_DIR`
    #[arg(long, env = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub file: PathBuf,
    pub mime_type: String,
    pub controller: Config,
    pub output_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Name the upload is announced under.
    pub fn file_name(&self) -> &str {
        self.file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.user_id.trim().is_empty() {
            bail!("EFFECT_USER_ID must not be empty");
        }
        if args.effect_id.trim().is_empty() {
            bail!("EFFECT_ID must not be empty");
        }
        if args.max_polls == 0 {
            bail!("MAX_POLLS must be greater than 0");
        }
        if args.poll_interval_ms == 0 {
            bail!("POLL_INTERVAL_MS must be greater than 0");
        }
        check_origin("API_ORIGIN", &args.api_origin)?;
        check_origin("CONTENT_ORIGIN", &args.content_origin)?;

        let mime_type = args
            .mime_type
            .unwrap_or_else(|| guess_mime_type(&args.file).to_owned());

        let mut effect = if args.video {
            EffectConfig::video(args.effect_id, args.user_id)
        } else {
            let mut effect = EffectConfig::image(args.effect_id, args.user_id);
            effect.model = args.model;
            effect
        };
        effect.tool_type = args.tool_type;
        effect.remove_watermark = !args.keep_watermark;
        effect.is_private = !args.public;

        let controller = Config::new(effect)
            .with_endpoints(Endpoints::new(args.api_origin, args.content_origin))
            .with_poll(PollConfig {
                interval: Duration::from_millis(args.poll_interval_ms),
                max_polls: args.max_polls,
            });

        Ok(Self {
            file: args.file,
            mime_type,
            controller,
            output_dir: args.output_dir,
        })
    }
}

fn check_origin(name: &str, origin: &str) -> anyhow::Result<()> {
    let url = Url::parse(origin).with_context(|| format!("{name} is not a valid URL: {origin}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{name} must be an http(s) origin, got {origin}");
    }
    Ok(())
}

fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}
