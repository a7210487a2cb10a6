use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mealplanner::calc::{
    image_url, instruction_steps, match_recipes, share_text, starter_recipes, total_time,
    MatchMode, NutritionProgress,
};
use mealplanner::config::Config;
use mealplanner::gateway::{
    AuthGateway, ChefGateway, DetectionGateway, GroceryGateway, ItemGateway, MealGateway,
    PantryGateway, PlanGateway, ProfileGateway, UtensilGateway,
};
use mealplanner::http::ApiClient;
use mealplanner::models::{
    Day, ListFilter, MealType, NewItem, NewMeal, NewUtensil, ProfileUpdate, UtensilCategory,
};
use mealplanner::planner::{MealPlannerStore, PlanReconciler};
use mealplanner::session::{FileSessionStore, SessionHandle};
use mealplanner::store::{CollectionStore, Outcome};

#[derive(Parser)]
#[command(name = "mealplanner")]
#[command(about = "Pantry, grocery list, weekly meal plan and AI chef from the terminal")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and remember the session
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Request a password reset token
    ForgotPassword { username: String },
    /// Set a new password with a reset token
    ResetPassword { token: String, new_password: String },
    #[command(subcommand)]
    Pantry(PantryCommand),
    #[command(subcommand)]
    Grocery(GroceryCommand),
    #[command(subcommand)]
    Utensils(UtensilCommand),
    #[command(subcommand)]
    Meals(MealCommand),
    #[command(subcommand)]
    Plan(PlanCommand),
    /// Ask the AI chef
    Ask {
        question: Vec<String>,
        /// Save the Nth suggested recipe (1-based) to your meals
        #[arg(long)]
        save: Option<usize>,
        /// Add the Nth suggested recipe's ingredients to the grocery list
        #[arg(long)]
        shop: Option<usize>,
    },
    /// Detect food items in a photo
    Detect {
        image: PathBuf,
        /// Add every detected item to the pantry
        #[arg(long)]
        add_to_pantry: bool,
    },
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Recipes you can make from your pantry
    Suggest {
        #[arg(long)]
        ignore_case: bool,
    },
}

#[derive(Subcommand)]
enum PantryCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Add { names: Vec<String> },
    Rename { id: i64, name: String },
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum GroceryCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Add { names: Vec<String> },
    Remove { id: i64 },
    /// Print the list as a shareable message
    Share,
}

#[derive(Subcommand)]
enum UtensilCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<UtensilCategory>,
    },
    Add {
        name: String,
        #[arg(long, default_value = "Other")]
        category: UtensilCategory,
    },
    Remove { id: i64 },
    /// Common utensils per category for quick add
    Catalog {
        #[arg(long)]
        category: Option<UtensilCategory>,
    },
}

#[derive(Subcommand)]
enum MealCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Show the week, or one day
    Show {
        #[arg(long)]
        day: Option<Day>,
    },
    Add {
        day: Day,
        meal_type: MealType,
        meal_id: i64,
    },
    Remove {
        day: Day,
        meal_type: MealType,
        meal_id: i64,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        calories: Option<f64>,
        #[arg(long)]
        protein: Option<f64>,
        #[arg(long)]
        carbs: Option<f64>,
        #[arg(long)]
        fat: Option<f64>,
    },
    /// Today's intake against your goals
    Nutrition,
}

struct App {
    config: Config,
    api: ApiClient,
    auth: AuthGateway,
}

impl App {
    fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.config.display.notice_secs)
    }

    fn require_login(&self) -> anyhow::Result<()> {
        if !self.api.session().is_authenticated() {
            bail!("Please log in first");
        }
        Ok(())
    }

    fn collection<G: ItemGateway>(&self, gateway: G) -> CollectionStore<G> {
        CollectionStore::new(gateway).with_notice_ttl(self.notice_ttl())
    }

    fn planner(&self) -> MealPlannerStore {
        let reconciler = PlanReconciler::new(
            PlanGateway::new(self.api.clone()),
            MealGateway::new(self.api.clone()),
        )
        .with_policy(self.config.planner.active_plan)
        .with_concurrency(self.config.planner.resolve_concurrency);
        MealPlannerStore::new(reconciler).with_notice_ttl(self.notice_ttl())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mealplanner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    tracing::debug!("Using API at {}", config.api.base_url);

    let api = ApiClient::new(&config.api, SessionHandle::default())?;
    let sessions = Arc::new(FileSessionStore::new(config.session.path.clone()));
    let auth = AuthGateway::new(api.clone(), sessions);
    auth.restore().await.context("Failed to restore session")?;

    let app = App { config, api, auth };

    match args.command {
        Command::Login { username, password } => {
            match app.auth.login(&username, &password).await {
                Ok(session) => println!("Welcome back, {}!", session.name),
                Err(e) => bail!(e.user_message("Login failed")),
            }
        }
        Command::Logout => {
            app.auth.logout().await?;
            println!("Logged out");
        }
        Command::ForgotPassword { username } => {
            let response = app
                .auth
                .forgot_password(&username)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Failed to request password reset")))?;
            if let Some(message) = response.message {
                println!("{message}");
            }
            if let Some(token) = response.reset_token {
                println!("Reset token: {token}");
            }
        }
        Command::ResetPassword {
            token,
            new_password,
        } => {
            app.auth
                .reset_password(&token, &new_password)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Failed to reset password")))?;
            println!("Password updated. You can log in now.");
        }
        Command::Pantry(cmd) => {
            app.require_login()?;
            pantry(&app, cmd).await?;
        }
        Command::Grocery(cmd) => {
            app.require_login()?;
            grocery(&app, cmd).await?;
        }
        Command::Utensils(cmd) => {
            app.require_login()?;
            utensils(&app, cmd).await?;
        }
        Command::Meals(cmd) => {
            app.require_login()?;
            meals(&app, cmd).await?;
        }
        Command::Plan(cmd) => {
            app.require_login()?;
            plan(&app, cmd).await?;
        }
        Command::Ask {
            question,
            save,
            shop,
        } => {
            app.require_login()?;
            ask(&app, &question.join(" "), save, shop).await?;
        }
        Command::Detect {
            image,
            add_to_pantry,
        } => {
            app.require_login()?;
            detect(&app, &image, add_to_pantry).await?;
        }
        Command::Profile(cmd) => {
            app.require_login()?;
            profile(&app, cmd).await?;
        }
        Command::Suggest { ignore_case } => {
            app.require_login()?;
            suggest(&app, ignore_case).await?;
        }
    }

    Ok(())
}

/// Prints the notice of a finished action and turns error notices into a failing exit.
fn report(outcome: Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::Completed(Some(notice)) if notice.is_error() => bail!(notice.message),
        Outcome::Completed(Some(notice)) => {
            println!("{notice}");
            Ok(())
        }
        Outcome::Completed(None) => Ok(()),
        Outcome::Busy => bail!("Another request is still running"),
        Outcome::Unmounted => Ok(()),
    }
}

fn print_items<T: mealplanner::gateway::Named>(items: &[T], empty: &str) {
    if items.is_empty() {
        println!("{empty}");
    }
    for item in items {
        println!("{:>5}  {}", item.id(), item.name());
    }
}

async fn pantry(app: &App, cmd: PantryCommand) -> anyhow::Result<()> {
    let store = app.collection(PantryGateway::new(app.api.clone()));
    match cmd {
        PantryCommand::List { search } => {
            report(store.load(&ListFilter::default()).await)?;
            print_items(&store.visible(&search), "Your pantry is empty");
        }
        PantryCommand::Add { names } => {
            let drafts: Vec<NewItem> = names.iter().map(|n| NewItem::new(n)).collect();
            if let [draft] = drafts.as_slice() {
                report(store.add(draft).await)?;
            } else {
                report(store.add_many(&drafts).await)?;
            }
        }
        PantryCommand::Rename { id, name } => {
            report(store.update(id, &NewItem::new(&name)).await)?;
        }
        PantryCommand::Remove { id } => report(store.remove(id).await)?,
    }
    Ok(())
}

async fn grocery(app: &App, cmd: GroceryCommand) -> anyhow::Result<()> {
    let store = app.collection(GroceryGateway::new(app.api.clone()));
    match cmd {
        GroceryCommand::List { search } => {
            report(store.load(&ListFilter::default()).await)?;
            print_items(&store.visible(&search), "Your grocery list is empty");
        }
        GroceryCommand::Add { names } => {
            let drafts: Vec<NewItem> = names.iter().map(|n| NewItem::new(n)).collect();
            if let [draft] = drafts.as_slice() {
                report(store.add(draft).await)?;
            } else {
                report(store.add_many(&drafts).await)?;
            }
        }
        GroceryCommand::Remove { id } => report(store.remove(id).await)?,
        GroceryCommand::Share => {
            report(store.load(&ListFilter::default()).await)?;
            match share_text(&store.items()) {
                Some(text) => println!("{text}"),
                None => bail!("Your grocery list is empty!"),
            }
        }
    }
    Ok(())
}

async fn utensils(app: &App, cmd: UtensilCommand) -> anyhow::Result<()> {
    let store = app.collection(UtensilGateway::new(app.api.clone()));
    match cmd {
        UtensilCommand::List { search, category } => {
            let filter = ListFilter {
                search: search.filter(|s| !s.is_empty()),
                category: category.map(|c| c.as_str().to_string()),
            };
            report(store.load(&filter).await)?;
            for utensil in store.visible("") {
                println!("{:>5}  {:<30} {}", utensil.id, utensil.name, utensil.category);
            }
        }
        UtensilCommand::Add { name, category } => {
            report(store.add(&NewUtensil::new(&name, category)).await)?;
        }
        UtensilCommand::Remove { id } => report(store.remove(id).await)?,
        UtensilCommand::Catalog { category } => {
            let categories = match category {
                Some(category) => vec![category],
                None => UtensilCategory::ALL.to_vec(),
            };
            for category in categories {
                let items = category.common_items();
                if !items.is_empty() {
                    println!("{category}: {}", items.join(", "));
                }
            }
        }
    }
    Ok(())
}

async fn meals(app: &App, cmd: MealCommand) -> anyhow::Result<()> {
    let store = app.collection(MealGateway::new(app.api.clone()));
    match cmd {
        MealCommand::List { search } => {
            report(store.load(&ListFilter::default()).await)?;
            let meals = store.visible(&search);
            if meals.is_empty() {
                println!("No saved meals yet");
            }
            for meal in meals {
                println!(
                    "{:>5}  {:<30} {:>8}  {:.0} kcal",
                    meal.id,
                    meal.name,
                    total_time(meal.prep_time, meal.cook_time),
                    meal.nutrients.calories
                );
            }
        }
        MealCommand::Remove { id } => report(store.remove(id).await)?,
    }
    Ok(())
}

async fn plan(app: &App, cmd: PlanCommand) -> anyhow::Result<()> {
    let store = app.planner();
    let loaded = store.load().await;
    if !store.is_plan_loaded() {
        report(loaded)?;
    } else if let Some(notice) = loaded.notice() {
        eprintln!("{notice}");
    }

    match cmd {
        PlanCommand::Show { day } => {
            if store.plan_id().is_none() {
                println!("No meal plan yet. Add a meal to start one.");
                return Ok(());
            }
            let days: Vec<Day> = match day {
                Some(day) => {
                    store.select_day(day);
                    vec![store.selected_day()]
                }
                None => Day::all().collect(),
            };
            for day in days {
                println!("{day}");
                for meal_type in MealType::ALL {
                    let meals = store.meals_for(day, meal_type);
                    let names: Vec<&str> = meals.iter().map(|m| m.name.as_str()).collect();
                    let shown = if names.is_empty() {
                        "-".to_string()
                    } else {
                        names.join(", ")
                    };
                    println!("  {:<10} {}", meal_type, shown);
                }
            }
        }
        PlanCommand::Add {
            day,
            meal_type,
            meal_id,
        } => report(store.add_meal(day, meal_type, meal_id).await)?,
        PlanCommand::Remove {
            day,
            meal_type,
            meal_id,
        } => report(store.remove_meal(day, meal_type, meal_id).await)?,
    }
    Ok(())
}

async fn ask(
    app: &App,
    question: &str,
    save: Option<usize>,
    shop: Option<usize>,
) -> anyhow::Result<()> {
    let chef = ChefGateway::new(app.api.clone());
    let reply = chef
        .ask(question)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Sorry, I couldn't process your question")))?;

    println!("{}", reply.answer.message());
    let recipes = reply.answer.recipes();
    for (i, recipe) in recipes.iter().enumerate() {
        println!();
        println!("{}. {} ({})", i + 1, recipe.name, total_time(recipe.prep_time, recipe.cook_time));
        println!("   Image: {}", image_url(app.api.base_url(), recipe.image.as_deref()));
        println!("   Ingredients: {}", recipe.ingredients.join(", "));
        for (n, step) in instruction_steps(&recipe.instructions).iter().enumerate() {
            println!("   {}. {}", n + 1, step);
        }
    }
    if let Some(follow_up) = &reply.follow_up {
        println!();
        println!("{follow_up}");
    }

    let pick = |n: usize| {
        n.checked_sub(1)
            .and_then(|i| recipes.get(i))
            .with_context(|| format!("No recipe number {n} in this answer"))
    };
    if let Some(n) = save {
        let meals = app.collection(MealGateway::new(app.api.clone()));
        report(meals.add(&NewMeal::from(pick(n)?)).await)?;
    }
    if let Some(n) = shop {
        let grocery = app.collection(GroceryGateway::new(app.api.clone()));
        let drafts: Vec<NewItem> = pick(n)?
            .ingredients
            .iter()
            .map(|i| NewItem::new(i))
            .collect();
        report(grocery.add_many(&drafts).await)?;
    }
    Ok(())
}

async fn detect(app: &App, image: &std::path::Path, add_to_pantry: bool) -> anyhow::Result<()> {
    let detector = DetectionGateway::new(app.api.clone());
    let detection = detector
        .detect_file(image)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Failed to detect food items")))?;

    if !detection.message.is_empty() {
        println!("{}", detection.message);
    }
    for item in &detection.detected_items {
        println!("  {:<24} {:>5.1}%", item.name, item.confidence * 100.0);
    }

    let names = detection.item_names();
    if add_to_pantry && !names.is_empty() {
        let pantry = app.collection(PantryGateway::new(app.api.clone()));
        let drafts: Vec<NewItem> = names.iter().map(|n| NewItem::new(n)).collect();
        report(pantry.add_many(&drafts).await)?;
    }
    Ok(())
}

async fn profile(app: &App, cmd: ProfileCommand) -> anyhow::Result<()> {
    let profiles = ProfileGateway::new(app.api.clone());
    match cmd {
        ProfileCommand::Show => {
            let profile = profiles
                .get()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Failed to load profile")))?;
            println!("{}", profile.name.as_deref().unwrap_or(&profile.username));
            println!("  Username: {}", profile.username);
            if let Some(email) = &profile.email {
                println!("  Email:    {email}");
            }
            if let (Some(height), Some(weight)) = (profile.height, profile.weight) {
                println!("  Height:   {height} cm, weight {weight} kg");
            }
            for (label, goal) in [
                ("Calories", profile.daily_calorie_goal),
                ("Protein", profile.daily_protein_goal),
                ("Carbs", profile.daily_carbs_goal),
                ("Fat", profile.daily_fat_goal),
            ] {
                if let Some(goal) = goal {
                    println!("  {label} goal: {goal:.0}");
                }
            }
        }
        ProfileCommand::Update {
            name,
            email,
            height,
            weight,
            calories,
            protein,
            carbs,
            fat,
        } => {
            let update = ProfileUpdate {
                name,
                email,
                height,
                weight,
                daily_calorie_goal: calories,
                daily_protein_goal: protein,
                daily_carbs_goal: carbs,
                daily_fat_goal: fat,
            };
            profiles
                .update(&update)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Failed to update profile")))?;
            println!("✓ Profile updated");
        }
        ProfileCommand::Nutrition => {
            let (profile, today) = tokio::try_join!(profiles.get(), profiles.nutrition_today())
                .map_err(|e| anyhow::anyhow!(e.user_message("Failed to load nutrition")))?;
            let progress = NutritionProgress::new(&today, &profile);
            for line in progress.iter() {
                println!("{line}");
            }
        }
    }
    Ok(())
}

async fn suggest(app: &App, ignore_case: bool) -> anyhow::Result<()> {
    let pantry = app.collection(PantryGateway::new(app.api.clone()));
    report(pantry.load(&ListFilter::default()).await)?;
    let names: Vec<String> = pantry.items().into_iter().map(|i| i.name).collect();

    let mode = if ignore_case {
        MatchMode::CaseInsensitive
    } else {
        MatchMode::Exact
    };
    let matches = match_recipes(
        &starter_recipes(),
        &names,
        mode,
        app.config.display.recipe_limit,
    );

    println!("Hello, {}! Here's what you can cook:", app.api.session().display_name());
    for m in matches {
        if m.can_make {
            println!("  ✓ {}", m.recipe.name);
        } else {
            println!("  · {}  (missing: {})", m.recipe.name, m.missing.join(", "));
        }
    }
    Ok(())
}
