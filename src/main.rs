use anyhow::Result;
use clap::{Parser, Subcommand};
use nit::areas::repository::Repository;
use nit::artifacts::objects::object_type::ObjectType;

#[derive(Parser)]
#[command(
    name = "nit",
    version = "0.1.0",
    about = "A minimal content-addressable object store and revision resolver",
    long_about = "nit stores blobs, trees, commits and tags as compressed, \
    hash-addressed loose objects and resolves human-readable names \
    (branches, tags, short hashes, HEAD) back to object hashes. \
    It is a learning project, not a git replacement.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Initialize a new empty repository")]
    Init {
        #[arg(index = 1, help = "Where to create the repository")]
        path: Option<String>,
    },
    #[command(name = "cat-file", about = "Print the content of an object")]
    CatFile {
        #[arg(index = 1, help = "The expected object type")]
        r#type: String,
        #[arg(index = 2, help = "The object to display")]
        object: String,
    },
    #[command(
        name = "hash-object",
        about = "Compute an object hash and optionally write the object"
    )]
    HashObject {
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object type")]
        r#type: String,
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1, help = "Read the object content from this file")]
        file: String,
    },
    #[command(name = "log", about = "Display the commit graph as Graphviz")]
    Log {
        #[arg(index = 1, default_value = "HEAD", help = "Commit to start at")]
        commit: String,
    },
    #[command(name = "ls-tree", about = "Pretty-print a tree object")]
    LsTree {
        #[arg(index = 1, help = "The tree-ish object to show")]
        object: String,
    },
    #[command(name = "checkout", about = "Check a commit out into a directory")]
    Checkout {
        #[arg(index = 1, help = "The commit or tree to check out")]
        commit: String,
        #[arg(index = 2, help = "The empty directory to check out into")]
        path: String,
    },
    #[command(name = "show-ref", about = "List references")]
    ShowRef,
    #[command(name = "tag", about = "List or create tags")]
    Tag {
        #[arg(short = 'a', long, help = "Create an annotated tag object")]
        annotate: bool,
        #[arg(index = 1, help = "The new tag's name; lists tags when omitted")]
        name: Option<String>,
        #[arg(index = 2, default_value = "HEAD", help = "The object the tag points at")]
        object: String,
    },
    #[command(name = "rev-parse", about = "Resolve a revision name to a hash")]
    RevParse {
        #[arg(short = 't', long = "type", help = "Coerce to this object type")]
        r#type: Option<String>,
        #[arg(index = 1, help = "The name to resolve")]
        name: String,
    },
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::discover(&pwd, Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()))?,
                None => {
                    let pwd = std::env::current_dir()?;
                    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?
                }
            };

            repository.init()?
        }
        Commands::CatFile { r#type, object } => {
            let want = ObjectType::try_from(r#type.as_str())?;
            open_repository()?.cat_file(object, want)?
        }
        Commands::HashObject {
            r#type,
            write,
            file,
        } => {
            let object_type = ObjectType::try_from(r#type.as_str())?;
            open_repository()?.hash_object(file, object_type, *write)?
        }
        Commands::Log { commit } => open_repository()?.log(commit)?,
        Commands::LsTree { object } => open_repository()?.ls_tree(object)?,
        Commands::Checkout { commit, path } => open_repository()?.checkout(commit, path)?,
        Commands::ShowRef => open_repository()?.show_ref()?,
        Commands::Tag {
            annotate,
            name,
            object,
        } => {
            let mut repository = open_repository()?;
            match name {
                Some(name) => repository.tag_create(name, object, *annotate)?,
                None => repository.tag_list()?,
            }
        }
        Commands::RevParse { r#type, name } => {
            let want = r#type
                .as_deref()
                .map(ObjectType::try_from)
                .transpose()?;
            open_repository()?.rev_parse(name, want)?
        }
    }

    Ok(())
}
