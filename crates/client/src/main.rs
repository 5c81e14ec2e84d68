use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use crm_client::api::CustomerApi;
use crm_client::controller::Controller;
use crm_client::model::CustomerForm;
use crm_client::render;
use crm_client::state::SyncPolicy;
use crm_core::types::DbId;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "crm")]
#[command(version, about = "Manage customer records", long_about = None)]
struct Cli {
    /// Base URL of the customer service
    #[arg(long, env = "CRM_API_URL", default_value = "http://localhost:3000", global = true)]
    api_url: String,

    /// How the local list is refreshed after a save
    #[arg(long, value_enum, default_value_t = SyncMode::Refetch, global = true)]
    sync: SyncMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SyncMode {
    Patch,
    Refetch,
}

impl From<SyncMode> for SyncPolicy {
    fn from(sync: SyncMode) -> Self {
        match sync {
            SyncMode::Patch => SyncPolicy::Patch,
            SyncMode::Refetch => SyncPolicy::Refetch,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all customers
    List,

    /// Show a single customer
    Show { id: DbId },

    /// Create a customer
    Create {
        #[arg(long)]
        email: String,

        #[command(flatten)]
        fields: FieldArgs,

        /// Create the customer as inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Update fields of an existing customer (unset flags are left unchanged)
    Update {
        id: DbId,

        #[arg(long)]
        email: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,

        /// Set the active flag
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a customer
    Delete {
        id: DbId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Optional text fields. Pass an empty string to blank a field.
#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    company_name: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
}

impl FieldArgs {
    fn apply(self, form: &mut CustomerForm) {
        let targets = [
            (self.first_name, &mut form.first_name),
            (self.last_name, &mut form.last_name),
            (self.phone, &mut form.phone),
            (self.company_name, &mut form.company_name),
            (self.address, &mut form.address),
            (self.city, &mut form.city),
        ];
        for (value, slot) in targets {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crm_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let api = CustomerApi::new(cli.api_url.clone());
    let mut controller = Controller::with_policy(api, cli.sync.into());

    match cli.command {
        Commands::List => {
            // The view records the failure; render it either way.
            let _ = controller.load().await;
            println!("{}", render::render_list(controller.view()));
        }

        Commands::Show { id } => {
            let customer = controller
                .find(id)
                .await
                .with_context(|| format!("Failed to fetch customer {id}"))?;
            println!("{}", render::render_detail(&customer));
        }

        Commands::Create {
            email,
            fields,
            inactive,
        } => {
            let view = controller.view_mut();
            view.open_create();
            let form = view.form_mut();
            form.email = email;
            fields.apply(form);
            form.is_active = !inactive;

            submit(&mut controller).await?;
        }

        Commands::Update {
            id,
            email,
            fields,
            active,
        } => {
            controller
                .edit(id)
                .await
                .with_context(|| format!("Failed to fetch customer {id}"))?;
            let form = controller.view_mut().form_mut();
            if let Some(email) = email {
                form.email = email;
            }
            fields.apply(form);
            if let Some(active) = active {
                form.is_active = active;
            }

            submit(&mut controller).await?;
        }

        Commands::Delete { id, yes } => {
            controller
                .request_delete(id)
                .await
                .with_context(|| format!("Failed to fetch customer {id}"))?;

            if let Some(prompt) = render::render_delete_dialog(controller.view()) {
                println!("{prompt}");
            }
            if !yes && !confirm()? {
                controller.view_mut().cancel_delete();
                println!("Cancelled.");
                return Ok(());
            }

            match controller.confirm_delete().await {
                Ok(customer) => println!("Deleted customer {} ({})", customer.id, customer.email),
                Err(err) => {
                    let message = controller.view().error().unwrap_or_default().to_string();
                    bail!("{message} ({err})");
                }
            }
        }
    }

    Ok(())
}

async fn submit(controller: &mut Controller<CustomerApi>) -> Result<()> {
    if let Some(form) = render::render_editor(controller.view()) {
        println!("{form}\n");
    }

    match controller.submit().await {
        Ok(customer) => {
            println!("{}", render::render_detail(&customer));
            Ok(())
        }
        Err(err) => {
            if let Some(form) = render::render_editor(controller.view()) {
                eprintln!("{form}");
            }
            Err(err.into())
        }
    }
}

fn confirm() -> Result<bool> {
    print!("Type 'y' to confirm: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
