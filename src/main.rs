use movie_finder::{
    config::Config,
    logging,
    models::{GenreId, Movie, RequestOutcome, SortSpec},
    services::{
        auxiliary::spawn_auxiliary_fetchers, spawn_query_listener, CatalogClient, DebouncedInput,
        QueryOrchestrator, QuerySnapshot,
    },
};
use tokio::io::{AsyncBufReadExt, BufReader};

enum Command {
    Type(String),
    Sort(SortSpec),
    Genre(GenreId),
    ClearGenres,
    Page(u32),
    ListGenres,
    Trending,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    match verb {
        "type" => Ok(Command::Type(rest.to_string())),
        "sort" => rest.parse().map(Command::Sort).map_err(|e| e.to_string()),
        "genre" => rest
            .trim()
            .parse()
            .map(Command::Genre)
            .map_err(|_| format!("not a genre id: {}", rest)),
        "clear" => Ok(Command::ClearGenres),
        "page" => rest
            .trim()
            .parse()
            .map(Command::Page)
            .map_err(|_| format!("not a page number: {}", rest)),
        "genres" => Ok(Command::ListGenres),
        "trending" => Ok(Command::Trending),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command: {}", other)),
    }
}

fn display_id(movie: &Movie) -> String {
    movie
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn render(snapshot: &QuerySnapshot) {
    let inputs = &snapshot.inputs;
    let mode = if inputs.query.is_empty() {
        format!("discover sort={}", inputs.filters.sort())
    } else {
        format!("search \"{}\"", inputs.query)
    };

    match &snapshot.outcome {
        RequestOutcome::Idle => {}
        RequestOutcome::Loading => println!("[{}] page {} loading...", mode, inputs.page),
        RequestOutcome::Success(page) => {
            println!("[{}] page {}/{}", mode, page.page, page.total_pages);
            for movie in &page.movies {
                let year = movie
                    .release_year()
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "----".to_string());
                let rating = movie
                    .vote_average()
                    .map(|r| format!("{:.1}", r))
                    .unwrap_or_else(|| "N/A".to_string());
                println!(
                    "  {:>8}  {}  {:>4}  {}",
                    display_id(movie),
                    year,
                    rating,
                    movie.title().unwrap_or("(untitled)")
                );
            }
        }
        outcome => {
            if let Some(notice) = outcome.notice() {
                println!("[{}] {}", mode, notice);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: {}", e);
    }

    let config = Config::from_env()?;
    let default_sort: SortSpec = config.default_sort.parse()?;
    let client = CatalogClient::from_config(&config)?;

    let aux = spawn_auxiliary_fetchers(&client);
    let orchestrator = QueryOrchestrator::new(client, default_sort);
    let tracker = DebouncedInput::spawn(config.debounce_interval());
    let _listener = spawn_query_listener(orchestrator.clone(), tracker.subscribe());

    let mut snapshots = orchestrator.subscribe();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            render(&snapshot);
        }
    });

    let initial = orchestrator.clone();
    tokio::spawn(async move {
        initial.refresh().await;
    });

    println!(
        "commands: type <text> | sort <field.dir> | genre <id> | clear | page <n> | genres | trending | quit"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(line.trim_end()) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        let orchestrator = orchestrator.clone();
        match command {
            Command::Type(text) => tracker.set(text),
            Command::Sort(spec) => {
                tokio::spawn(async move {
                    orchestrator.set_sort(spec).await;
                });
            }
            Command::Genre(id) => {
                tokio::spawn(async move {
                    orchestrator.toggle_genre(id).await;
                });
            }
            Command::ClearGenres => {
                tokio::spawn(async move {
                    orchestrator.clear_genres().await;
                });
            }
            Command::Page(page) => {
                tokio::spawn(async move {
                    if let Err(e) = orchestrator.change_page(page).await {
                        eprintln!("{}", e);
                    }
                });
            }
            Command::ListGenres => {
                let catalog = aux.genres.borrow().clone();
                let selected = orchestrator.snapshot().await.inputs.filters;
                for (id, name) in catalog.iter() {
                    let mark = if selected.genres().contains(id) { "x" } else { " " };
                    println!("  [{}] {:>6} {}", mark, id, name);
                }
            }
            Command::Trending => {
                for movie in aux.trending.borrow().iter() {
                    println!(
                        "  {:>8}  {}",
                        display_id(movie),
                        movie.title().unwrap_or("(untitled)")
                    );
                }
            }
            Command::Quit => break,
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}
