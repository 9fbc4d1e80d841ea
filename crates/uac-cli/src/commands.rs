//! Command implementations.

use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::runtime::Builder;
use tokio::task::LocalSet;
use uac_cli::settings::Settings;
use uac_query::{ListQueryCodec, MemoryLocation, RawQuery};
use uac_reactive::ManualScheduler;
use uac_users::{
    ListOutcome, MemoryBackend, UserField, UserForm, UserStatus, UserStore, UsersListController,
};

use crate::cli::{Cli, Command, CreateArgs, ListArgs, SearchArgs, StatusArg, UpdateArgs};
use crate::output::{print_field_errors, print_list, print_user};

type Controller = UsersListController<MemoryLocation, Rc<MemoryBackend>>;

/// Shared state of one invocation.
struct Console {
    settings: Settings,
    backend: Rc<MemoryBackend>,
    store: Rc<UserStore<Rc<MemoryBackend>>>,
}

impl Console {
    fn open(cli: &Cli) -> Result<Self> {
        let settings = match &cli.config {
            Some(path) => Settings::load_from(path),
            None => Settings::load(),
        };
        let db_path = settings.resolve_db_path(cli.db.clone());
        let backend = Rc::new(
            MemoryBackend::load(&db_path)
                .with_context(|| format!("failed to open user database {}", db_path.display()))?,
        );
        let store = Rc::new(UserStore::new(Rc::clone(&backend)));
        Ok(Self {
            settings,
            backend,
            store,
        })
    }

    /// List page controller over a location holding `query`.
    fn list_page(&self, query: Option<&str>, scheduler: &ManualScheduler) -> Controller {
        let location = MemoryLocation::new();
        location.navigate(RawQuery::from_query_string(query.unwrap_or_default()));
        UsersListController::new(
            Rc::clone(&self.store),
            location,
            ListQueryCodec::new(self.settings.list_defaults()),
            self.settings.search_debounce(),
            Rc::new(scheduler.clone()),
        )
    }

    fn persist(&self) -> Result<()> {
        self.backend.save().context("failed to save user database")
    }
}

/// Run the parsed command on a single-threaded runtime; returns the exit code.
pub fn run(cli: Cli) -> Result<i32> {
    let runtime = Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;
    let console = Console::open(&cli)?;

    LocalSet::new().block_on(&runtime, async move {
        match cli.command {
            Command::List(args) => run_list(&console, &args).await,
            Command::Search(args) => run_search(&console, &args).await,
            Command::Show { id } => run_show(&console, id).await,
            Command::Create(args) => run_create(&console, args).await,
            Command::Update(args) => run_update(&console, args).await,
        }
    })
}

async fn run_list(console: &Console, args: &ListArgs) -> Result<i32> {
    let scheduler = ManualScheduler::new();
    let page = console.list_page(args.query.as_deref(), &scheduler);
    finish_list(&page).await
}

async fn run_search(console: &Console, args: &SearchArgs) -> Result<i32> {
    let scheduler = ManualScheduler::new();
    let page = console.list_page(args.query.as_deref(), &scheduler);
    let gap = Duration::from_millis(args.gap_ms);

    for keystroke in &args.keystrokes {
        page.set_search(keystroke.as_str());
        scheduler.advance(gap);
        tracing::debug!(
            keystroke = %keystroke,
            at = ?scheduler.now(),
            pending = page.is_search_pending(),
            "typed"
        );
    }
    scheduler.run_until_idle();
    tracing::info!(
        settled = %page.settled_search().get(),
        at = ?scheduler.now(),
        location_writes = page.location().replace_count(),
        "search settled"
    );

    // The location watcher sees our own write; it must not trigger a reload.
    if page.on_navigate() {
        tracing::warn!("location echo was applied as navigation");
    }
    finish_list(&page).await
}

async fn finish_list(page: &Controller) -> Result<i32> {
    if page.refresh().await == ListOutcome::Failed {
        let message = page.store().list().error.unwrap_or_default();
        bail!("failed to list users: {message}");
    }
    print_list(&page.store().list(), &page.location().query_string());
    Ok(0)
}

async fn run_show(console: &Console, id: u64) -> Result<i32> {
    match console.store.fetch_one(id).await {
        Some(user) => {
            print_user(&user);
            Ok(0)
        }
        None => {
            let message = console.store.detail().error.unwrap_or_default();
            bail!("{message}")
        }
    }
}

async fn run_create(console: &Console, args: CreateArgs) -> Result<i32> {
    let mut form = UserForm::new();
    form.input(UserField::FullName, args.full_name);
    form.input(UserField::Email, args.email);
    form.input(UserField::Status, status_text(args.status));

    let Some(fields) = form.submit() else {
        print_field_errors(form.engine().errors());
        return Ok(1);
    };
    let user = console
        .store
        .create(fields)
        .await
        .context("failed to create user")?;
    console.persist()?;
    print_user(&user);
    Ok(0)
}

async fn run_update(console: &Console, args: UpdateArgs) -> Result<i32> {
    let Some(user) = console.store.fetch_one(args.id).await else {
        let message = console.store.detail().error.unwrap_or_default();
        bail!("{message}");
    };

    let mut form = UserForm::from_user(&user);
    if let Some(full_name) = args.full_name {
        form.input(UserField::FullName, full_name);
    }
    if let Some(email) = args.email {
        form.input(UserField::Email, email);
    }
    if let Some(status) = args.status {
        form.input(UserField::Status, status_text(status));
    }

    let Some(fields) = form.submit() else {
        print_field_errors(form.engine().errors());
        return Ok(1);
    };
    let updated = console
        .store
        .update(args.id, fields)
        .await
        .with_context(|| format!("failed to update user {}", args.id))?;
    console.persist()?;
    print_user(&updated);
    Ok(0)
}

fn status_text(status: StatusArg) -> String {
    UserStatus::from(status).as_str().to_string()
}
