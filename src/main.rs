use std::path::PathBuf;
use std::sync::Arc;

use blogspace::api::{ApiError, HttpPostsApi};
use blogspace::clock::SystemClock;
use blogspace::config::{BlogConfig, ConfigError, normalize_base_url};
use blogspace::storage::FileStorage;
use blogspace::types::{AuthOutcome, Post};
use blogspace::{PostsError, PostsStore, SessionStore};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Posts(#[from] PostsError),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Fetch(String),
    #[error("not logged in; run `blogspace login` first")]
    NotAuthenticated,
    #[error("post {0} not found")]
    NotFound(u64),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "blogspace", about = "BlogSpace posts and session CLI")]
struct Cli {
    #[arg(long, env = "BLOG_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "BLOG_SESSION_DIR")]
    session_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    Posts(PostsCommand),
}

#[derive(Args, Debug)]
struct PostsCommand {
    #[command(subcommand)]
    command: PostsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PostsSubcommand {
    List,
    Show {
        id: u64,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
    },
    Update {
        id: u64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
    },
    Delete {
        id: u64,
    },
}

struct CliContext {
    session: SessionStore,
    posts: PostsStore,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = BlogConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config.api_base_url = normalize_base_url(base_url)?;
    }
    if let Some(dir) = cli.session_dir {
        config.session_dir = dir;
    }
    tracing::debug!(api = %config.api_base_url, session_dir = %config.session_dir.display(), "config loaded");

    let clock = Arc::new(SystemClock);
    let storage = Arc::new(FileStorage::new(&config.session_dir));
    let api = Arc::new(HttpPostsApi::from_config(&config)?);
    let ctx = CliContext {
        session: SessionStore::from_config(&config, storage, clock.clone()),
        posts: PostsStore::from_config(&config, api, clock),
    };

    match cli.command {
        Command::Login { email, password } => report_auth(ctx.session.login(&email, &password).await),
        Command::Register { name, email, password } => {
            report_auth(ctx.session.register(&name, &email, &password).await)
        }
        Command::Logout => {
            ctx.session.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami => run_whoami(&ctx),
        Command::Posts(posts) => run_posts(&ctx, posts).await,
    }
}

fn report_auth(outcome: AuthOutcome) -> Result<(), CliError> {
    if outcome.success {
        println!("ok");
        Ok(())
    } else {
        Err(CliError::Auth(outcome.error.unwrap_or_default()))
    }
}

fn run_whoami(ctx: &CliContext) -> Result<(), CliError> {
    let user = ctx.session.user().ok_or(CliError::NotAuthenticated)?;
    println!("{} <{}> (id {})", user.name, user.email, user.id);
    Ok(())
}

async fn run_posts(ctx: &CliContext, posts: PostsCommand) -> Result<(), CliError> {
    match posts.command {
        PostsSubcommand::List => {
            load_posts(ctx).await?;
            for post in ctx.posts.posts() {
                print_summary(&post);
            }
            Ok(())
        }
        PostsSubcommand::Show { id } => {
            load_posts(ctx).await?;
            let post = ctx.posts.get_post_by_id(id).ok_or(CliError::NotFound(id))?;
            print_json(&post)
        }
        PostsSubcommand::Create { title, body } => {
            let user = ctx.session.user().ok_or(CliError::NotAuthenticated)?;
            let post = ctx.posts.create_post(&title, &body, user.id).await?;
            print_json(&post)
        }
        PostsSubcommand::Update { id, title, body } => {
            require_auth(ctx)?;
            load_posts(ctx).await?;
            ctx.posts.update_post(id, &title, &body).await?;
            let post = ctx.posts.get_post_by_id(id).ok_or(CliError::NotFound(id))?;
            print_json(&post)
        }
        PostsSubcommand::Delete { id } => {
            require_auth(ctx)?;
            load_posts(ctx).await?;
            ctx.posts.delete_post(id).await?;
            println!("deleted {id}");
            Ok(())
        }
    }
}

fn require_auth(ctx: &CliContext) -> Result<(), CliError> {
    if ctx.session.check_auth() { Ok(()) } else { Err(CliError::NotAuthenticated) }
}

async fn load_posts(ctx: &CliContext) -> Result<(), CliError> {
    ctx.posts.fetch_posts().await;
    match ctx.posts.error() {
        Some(message) => Err(CliError::Fetch(message)),
        None => Ok(()),
    }
}

fn print_summary(post: &Post) {
    println!("{:>6}  {}  {}", post.id, post.created_at.format("%b %-d, %Y"), post.title);
}

fn print_json(value: &impl serde::Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
