use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use menu_planner_rs::cli::{
    AttachCommand, Cli, Command, EntryCommand, OrderCommand, PlanCommand, RecipeArgs,
    RecipeCommand, RecipeUpdateArgs,
};
use menu_planner_rs::error::{MenuError, Result};
use menu_planner_rs::interface::{
    confirm_delete, default_export_file_name, display_budget, display_consolidated,
    display_order_list, display_plan, display_plan_list, display_recipe, display_recipe_list,
    export_order_list, resolve_recipe,
};
use menu_planner_rs::models::Ingredient;
use menu_planner_rs::planner::{consolidate_ingredients, summarize_budget};
use menu_planner_rs::state::{
    MenuStore, NewEntry, NewPlan, NewRecipe, OrderListUpdate, PlanUpdate, RecipeUpdate,
    load_store, save_store, seed_demo_recipes,
};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Console logging on stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "menu_planner=debug,menu_planner_rs=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Loaded store plus the options every command needs.
struct Session {
    path: PathBuf,
    owner: u32,
    assume_yes: bool,
    store: MenuStore,
}

impl Session {
    fn save(&self) -> Result<()> {
        save_store(&self.path, &self.store.to_data())
    }

    /// Resolve a recipe reference (id or name) to an id owned by the user.
    fn recipe_id(&self, reference: &str) -> Result<u32> {
        let recipes = self.store.recipes(self.owner);
        let id = resolve_recipe(&recipes, reference, self.assume_yes)?;
        self.store.recipe(self.owner, id).map(|r| r.id)
    }

    /// Print the budget of `plan_id` as it stands after a change.
    fn show_budget(&self, plan_id: u32) -> Result<()> {
        let snapshot = self.store.plan_snapshot(self.owner, plan_id)?;
        display_budget(&summarize_budget(&snapshot));
        Ok(())
    }
}

fn run(cli: Cli) -> Result<()> {
    let path = PathBuf::from(&cli.file);
    let store = MenuStore::new(load_store(&path)?);
    let mut session = Session {
        path,
        owner: cli.user,
        assume_yes: cli.yes,
        store,
    };

    match cli.command.unwrap_or_default() {
        Command::Recipe(cmd) => cmd_recipe(&mut session, cmd),
        Command::Plan(cmd) => cmd_plan(&mut session, cmd),
        Command::Entry(cmd) => cmd_entry(&mut session, cmd),
        Command::Attach(cmd) => cmd_attach(&mut session, cmd),
        Command::Order(cmd) => cmd_order(&mut session, cmd),
        Command::Seed => cmd_seed(&mut session),
    }
}

/// Parse "name;quantity;unit;price" with price in major units.
fn parse_ingredient(raw: &str) -> Result<Ingredient> {
    let parts: Vec<&str> = raw.split(';').map(str::trim).collect();
    let (name, quantity, unit, price) = match parts.as_slice() {
        [name, quantity, unit] => (*name, *quantity, *unit, "0"),
        [name, quantity, unit, price] => (*name, *quantity, *unit, *price),
        _ => {
            return Err(MenuError::InvalidInput(format!(
                "Ingredient '{}' must look like name;quantity;unit;price",
                raw
            )));
        }
    };

    if name.is_empty() {
        return Err(MenuError::InvalidInput(format!(
            "Ingredient '{}' has no name",
            raw
        )));
    }

    let price: f64 = price
        .replace(',', ".")
        .parse()
        .map_err(|_| MenuError::InvalidInput(format!("Invalid price in '{}'", raw)))?;

    Ok(Ingredient::new(
        name,
        quantity,
        unit,
        (price * 100.0).round() as i64,
    ))
}

fn parse_ingredients(specs: &[String]) -> Result<Vec<Ingredient>> {
    specs.iter().map(|s| parse_ingredient(s)).collect()
}

fn cmd_recipe(session: &mut Session, cmd: RecipeCommand) -> Result<()> {
    let owner = session.owner;

    match cmd {
        RecipeCommand::List => {
            display_recipe_list(&session.store.recipes(owner));
        }
        RecipeCommand::Show { recipe } => {
            let id = session.recipe_id(&recipe)?;
            display_recipe(session.store.recipe(owner, id)?);
        }
        RecipeCommand::Add(RecipeArgs {
            name,
            description,
            category,
            portions,
            ingredients,
        }) => {
            let new = NewRecipe {
                name,
                description,
                category,
                default_portions: portions,
                ingredients: parse_ingredients(&ingredients)?,
            };
            let recipe = session.store.create_recipe(owner, new)?;
            println!("Created recipe #{} '{}'.", recipe.id, recipe.name);
            display_recipe(recipe);
            session.save()?;
        }
        RecipeCommand::Update {
            recipe,
            fields:
                RecipeUpdateArgs {
                    name,
                    description,
                    category,
                    portions,
                    ingredients,
                },
        } => {
            let id = session.recipe_id(&recipe)?;
            let update = RecipeUpdate {
                name,
                description,
                category,
                default_portions: portions,
                ingredients: if ingredients.is_empty() {
                    None
                } else {
                    Some(parse_ingredients(&ingredients)?)
                },
            };
            display_recipe(session.store.update_recipe(owner, id, update)?);
            session.save()?;
        }
        RecipeCommand::Delete { recipe } => {
            let id = session.recipe_id(&recipe)?;
            let name = session.store.recipe(owner, id)?.name.clone();
            if !confirm_delete(&format!("recipe '{}'", name), session.assume_yes)? {
                println!("Nothing deleted.");
                return Ok(());
            }
            session.store.delete_recipe(owner, id)?;
            session.save()?;
            println!("Deleted recipe '{}'.", name);
        }
    }

    Ok(())
}

fn cmd_plan(session: &mut Session, cmd: PlanCommand) -> Result<()> {
    let owner = session.owner;

    match cmd {
        PlanCommand::List => {
            display_plan_list(&session.store.plans(owner));
        }
        PlanCommand::Show { plan } => {
            let snapshot = session.store.plan_snapshot(owner, plan)?;
            display_plan(&snapshot);
        }
        PlanCommand::Create {
            name,
            description,
            start,
            end,
            status,
            budget,
            tolerance,
        } => {
            let new = NewPlan {
                name,
                description,
                start_date: start,
                end_date: end,
                status,
                max_budget_per_day: budget,
                budget_tolerance: tolerance,
            };
            let plan = session.store.create_plan(owner, new)?;
            println!(
                "Created plan #{} '{}' ({} .. {}).",
                plan.id, plan.name, plan.start_date, plan.end_date
            );
            session.save()?;
        }
        PlanCommand::Update {
            plan,
            name,
            description,
            start,
            end,
            status,
            budget,
            tolerance,
        } => {
            let update = PlanUpdate {
                name,
                description,
                start_date: start,
                end_date: end,
                status,
                max_budget_per_day: budget,
                budget_tolerance: tolerance,
            };
            session.store.update_plan(owner, plan, update)?;
            session.save()?;
            session.show_budget(plan)?;
        }
        PlanCommand::Delete { plan } => {
            let name = session.store.plan(owner, plan)?.name.clone();
            if !confirm_delete(&format!("plan '{}' and all its meals", name), session.assume_yes)? {
                println!("Nothing deleted.");
                return Ok(());
            }
            session.store.delete_plan(owner, plan)?;
            session.save()?;
            println!("Deleted plan '{}'.", name);
        }
        PlanCommand::Duplicate { plan, start, end } => {
            let copy = session.store.duplicate_plan(owner, plan, start, end)?;
            println!(
                "Created plan #{} '{}' with {} meals.",
                copy.id,
                copy.name,
                copy.entries.len()
            );
            session.save()?;
        }
        PlanCommand::Budget { plan } => {
            session.show_budget(plan)?;
        }
    }

    Ok(())
}

fn cmd_entry(session: &mut Session, cmd: EntryCommand) -> Result<()> {
    let owner = session.owner;

    let plan_id = match cmd {
        EntryCommand::Add {
            plan,
            date,
            meal,
            recipe,
            portions,
            notes,
        } => {
            let recipe_id = session.recipe_id(&recipe)?;
            let entry = session.store.add_entry(
                owner,
                plan,
                NewEntry {
                    date,
                    meal_type: meal,
                    recipe_id,
                    portions,
                    notes,
                },
            )?;
            println!("Added {} on {} as entry #{}.", entry.meal_type, entry.date, entry.id);
            plan
        }
        EntryCommand::Update {
            entry,
            portions,
            notes,
        } => {
            session.store.update_entry(owner, entry, portions, notes)?;
            println!("Updated entry #{}.", entry);
            session.store.entry_plan_id(owner, entry)?
        }
        EntryCommand::Remove { entry } => {
            let plan = session.store.entry_plan_id(owner, entry)?;
            if !confirm_delete(&format!("entry #{}", entry), session.assume_yes)? {
                println!("Nothing deleted.");
                return Ok(());
            }
            session.store.delete_entry(owner, entry)?;
            println!("Removed entry #{}.", entry);
            plan
        }
    };

    session.save()?;
    session.show_budget(plan_id)
}

fn cmd_attach(session: &mut Session, cmd: AttachCommand) -> Result<()> {
    let owner = session.owner;

    let entry_id = match cmd {
        AttachCommand::Add {
            entry,
            recipe,
            portions,
            alternative,
        } => {
            let recipe_id = session.recipe_id(&recipe)?;
            let attachment =
                session
                    .store
                    .add_attachment(owner, entry, recipe_id, portions, alternative)?;
            println!("Attached recipe as #{} to entry #{}.", attachment.id, entry);
            entry
        }
        AttachCommand::Update {
            attachment,
            portions,
            selected,
        } => {
            session
                .store
                .update_attachment(owner, attachment, portions, selected)?;
            println!("Updated attachment #{}.", attachment);
            session.store.attachment_entry_id(owner, attachment)?
        }
        AttachCommand::Remove { attachment } => {
            let entry = session.store.attachment_entry_id(owner, attachment)?;
            session.store.remove_attachment(owner, attachment)?;
            println!("Removed attachment #{}.", attachment);
            entry
        }
    };

    session.save()?;
    let plan_id = session.store.entry_plan_id(owner, entry_id)?;
    session.show_budget(plan_id)
}

fn cmd_order(session: &mut Session, cmd: OrderCommand) -> Result<()> {
    let owner = session.owner;

    let list_id = match cmd {
        OrderCommand::List => {
            let lists = session.store.order_lists(owner);
            if lists.is_empty() {
                println!("No order lists yet. Use 'order generate <plan>' to create one.");
            }
            for list in lists {
                println!(
                    "{:>4}  {:<28} {:<10} {}  {} items",
                    list.id,
                    list.name,
                    list.status,
                    list.created_on,
                    list.items.len()
                );
            }
            return Ok(());
        }
        OrderCommand::Show { order } => order,
        OrderCommand::Generate { plan, name } => {
            let today = chrono::Local::now().date_naive();
            let list = session
                .store
                .generate_order_list(owner, plan, name.as_deref(), today)?;
            println!(
                "Generated order list #{} '{}' with {} items.",
                list.id,
                list.name,
                list.items.len()
            );
            let id = list.id;
            session.save()?;
            id
        }
        OrderCommand::Create { name, plan, notes } => {
            let today = chrono::Local::now().date_naive();
            let list = session
                .store
                .create_order_list(owner, &name, plan, notes, today)?;
            println!("Created order list #{} '{}'.", list.id, list.name);
            let id = list.id;
            session.save()?;
            id
        }
        OrderCommand::Update {
            order,
            name,
            status,
            notes,
        } => {
            session
                .store
                .update_order_list(owner, order, OrderListUpdate { name, status, notes })?;
            session.save()?;
            order
        }
        OrderCommand::LeadTime {
            order,
            item,
            days,
            prep,
        } => {
            session.store.set_item_timing(owner, order, item, days, prep)?;
            session.save()?;
            order
        }
        OrderCommand::Delete { order } => {
            let name = session.store.order_list(owner, order)?.name.clone();
            if !confirm_delete(&format!("order list '{}'", name), session.assume_yes)? {
                println!("Nothing deleted.");
                return Ok(());
            }
            session.store.delete_order_list(owner, order)?;
            session.save()?;
            println!("Deleted order list '{}'.", name);
            return Ok(());
        }
        OrderCommand::Export {
            order,
            format,
            output,
        } => {
            let snapshot = session.store.order_list_snapshot(owner, order)?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(default_export_file_name(&snapshot.order_list.name, format))
            });
            export_order_list(&snapshot, format, &path)?;
            println!("Exported order list to {}.", path.display());
            return Ok(());
        }
    };

    let snapshot = session.store.order_list_snapshot(owner, list_id)?;
    display_order_list(&snapshot);
    display_consolidated(&consolidate_ingredients(&snapshot.items));
    Ok(())
}

fn cmd_seed(session: &mut Session) -> Result<()> {
    let created = seed_demo_recipes(&mut session.store, session.owner)?;
    if created == 0 {
        println!("Demo recipes already present.");
        return Ok(());
    }
    session.save()?;
    println!("Added {} demo recipes.", created);
    Ok(())
}
