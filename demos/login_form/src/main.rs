//! Headless login form
//!
//! Drives a two-field login form through the formwork runtime the way a UI
//! would: fields resolve their form through the container hierarchy, type
//! into it, and the submit button only fires once validation passes.
//!
//! ```text
//! cargo run -p login_form [config.ron]
//! RUST_LOG=formwork_runtime=trace cargo run -p login_form
//! ```

use formwork_core::{
    min_length, required, Change, ClickHandler, FieldPath, Helpers, Meta, MetaPatch, Metas,
    Modify, Values,
};
use formwork_runtime::{
    FieldBinding, Form, FormConfig, FormHandle, FormRegistry, FormScope, LogicError,
};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FORM_NAME: &str = "login";

/// A node of the (imaginary) view tree
struct Container<'a> {
    form: Option<&'a str>,
    parent: Option<&'a Container<'a>>,
}

impl FormScope for Container<'_> {
    fn form_marker(&self) -> Option<&str> {
        self.form
    }

    fn parent(&self) -> Option<&Self> {
        self.parent
    }
}

fn path(raw: &str) -> Result<FieldPath, formwork_core::Error> {
    FieldPath::parse(raw)
}

/// Seed the form: a remembered user name and a disabled submit button whose
/// click handler dumps the current values
async fn init(form: FormHandle) {
    let values_store = form.values();
    let on_submit = ClickHandler::new(move || {
        let values = values_store.get().current;
        match ron::ser::to_string_pretty(&values, ron::ser::PrettyConfig::default()) {
            Ok(text) => println!("submitting:\n{text}"),
            Err(err) => tracing::error!(error = %err, "failed to render values"),
        }
    });

    let (Ok(name), Ok(submit)) = (path("user.name"), path("submit")) else {
        return;
    };
    let values = Values::new().set_value(&name, "ivan");
    let submit_meta = Meta::new().with_disabled(true).with_click(on_submit);
    let metas = Metas::new().set_leaf(&submit, submit_meta);
    if let Err(err) = form.submit(Change::reset(values, metas)) {
        tracing::error!(error = %err, "failed to seed form");
    }
}

async fn logic(mut helpers: Helpers) -> Result<Helpers, LogicError> {
    // Stand-in for a server round trip.
    tokio::time::sleep(Duration::from_millis(100)).await;

    helpers.check(&path("user.name")?, &[&required()])?;
    helpers.check(&path("user.password")?, &[&required(), &min_length(6)])?;
    let disabled = helpers.has_errors();
    helpers.modify(Modify::field(path("submit")?).meta(MetaPatch::new().disabled(disabled)))?;
    Ok(helpers)
}

fn report(label: &str, fields: &[&FieldBinding]) {
    println!("-- {label}");
    for field in fields {
        let meta = field.meta();
        println!(
            "  {:<14} value={:<10} disabled={:<5} error={}",
            field.path().to_string(),
            field.value().to_string(),
            meta.disabled,
            meta.error.as_deref().unwrap_or("-"),
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(config_path) => {
            info!(path = %config_path, "loading form configuration");
            FormConfig::load(&config_path)?
        }
        None => FormConfig::default(),
    };

    let registry = FormRegistry::new();

    // Fields attach before the form exists, as they would when the view
    // tree renders first.
    let page = Container { form: Some(FORM_NAME), parent: None };
    let credentials = Container { form: None, parent: Some(&page) };
    let mut name = FieldBinding::in_scope(&registry, &credentials, path("user.name")?);
    let password = FieldBinding::in_scope(&registry, &credentials, path("user.password")?);
    let submit = FieldBinding::in_scope(&registry, &page, path("submit")?);

    let form = Form::builder(FORM_NAME)
        .config(config)
        .init(init)
        .logic(logic)
        .spawn_in(&registry);

    let (seeded, _) = name.changed().await?;
    info!(user = %seeded, "form seeded");
    form.settled().await?;
    report("after init", &[&name, &password, &submit]);
    println!("  submit clicked: {}", submit.click());

    password.input("abc")?;
    form.settled().await?;
    report("short password", &[&name, &password, &submit]);
    println!("  submit clicked: {}", submit.click());

    name.input("")?;
    password.input("hunter22")?;
    form.settled().await?;
    report("empty name", &[&name, &password, &submit]);

    name.input("ivan")?;
    let status = form.settled().await?;
    report("valid", &[&name, &password, &submit]);
    println!("  submit clicked: {}", submit.click());

    info!(
        generation = %status.generation,
        runs_started = status.runs_started,
        runs_merged = status.runs_merged,
        runs_discarded = status.runs_discarded,
        "done"
    );
    Ok(())
}
