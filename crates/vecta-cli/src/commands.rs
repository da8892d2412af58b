use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use tracing::debug;
use vecta_data::{infer, Item, Value, Vector};
use vecta_store::{Retrieval, StoreError, StoreRegistry, STDOUT};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let registry = StoreRegistry::default();
    match cli.command {
        Command::Get(args) => cmd_get(&registry, args),
        Command::Set(args) => cmd_set(&registry, args),
        Command::List(args) => cmd_list(&registry, args),
        Command::Delete(args) => cmd_delete(&registry, args),
        Command::Convert(args) => cmd_convert(&registry, args),
        Command::Show(args) => cmd_show(&registry, args),
    }
}

fn cmd_get(registry: &StoreRegistry, args: GetArgs) -> anyhow::Result<()> {
    let vector = load(registry, &parse_addr(&args.addr)?)?;
    let Some(item) = vector.get(&args.key) else {
        bail!("{} not found in {}", args.key, args.addr);
    };
    println!("{}", render(item.provided()));
    Ok(())
}

fn cmd_set(registry: &StoreRegistry, args: SetArgs) -> anyhow::Result<()> {
    let retrieval = parse_addr(&args.addr)?;
    let value = parse_value(args.kind, &args.value)?;
    let kind = value.kind();
    let shown = render(&value);
    set_value(registry, &retrieval, &args.key, value)?;
    println!(
        "{} {} = {} ({})",
        "✓".green().bold(),
        args.key.bold(),
        shown,
        kind.to_string().dimmed()
    );
    Ok(())
}

fn cmd_list(registry: &StoreRegistry, args: ListArgs) -> anyhow::Result<()> {
    let vector = load(registry, &parse_addr(&args.addr)?)?;
    let items = match &args.prefix {
        Some(prefix) => vector.subtree(prefix),
        None => vector.list(&[]),
    };
    if items.is_empty() {
        println!("No items.");
        return Ok(());
    }
    for item in &items {
        println!(
            "{}  {}  {}",
            item.key().bold(),
            item.kind().to_string().dimmed(),
            render(item.provided())
        );
    }
    Ok(())
}

fn cmd_delete(registry: &StoreRegistry, args: DeleteArgs) -> anyhow::Result<()> {
    let retrieval = parse_addr(&args.addr)?;
    if delete_key(registry, &retrieval, &args.key, args.subtree)? {
        let what = if args.subtree { "subtree" } else { "key" };
        println!("{} Deleted {} {}", "✓".green().bold(), what, args.key.yellow());
    } else {
        println!("Nothing stored under {}.", args.key.yellow());
    }
    Ok(())
}

fn cmd_convert(registry: &StoreRegistry, args: ConvertArgs) -> anyhow::Result<()> {
    let from = parse_addr(&args.from)?;
    let to = parse_addr(&args.to)?;
    let count = convert(registry, &from, &to)?;
    if to.format() != STDOUT {
        println!(
            "{} Converted {} items from {} to {}",
            "✓".green().bold(),
            count,
            from.to_string().cyan(),
            to.to_string().cyan()
        );
    }
    Ok(())
}

fn cmd_show(registry: &StoreRegistry, args: ShowArgs) -> anyhow::Result<()> {
    let vector = load(registry, &parse_addr(&args.addr)?)?;
    let bytes = vector.to_json(!args.compact)?;
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}

// ---------------------------------------------------------------------------
// Store plumbing
// ---------------------------------------------------------------------------

fn parse_addr(addr: &str) -> anyhow::Result<Retrieval> {
    addr.parse()
        .with_context(|| format!("invalid address {addr:?}"))
}

fn load(registry: &StoreRegistry, retrieval: &Retrieval) -> anyhow::Result<Arc<Vector>> {
    let mut store = registry.open(retrieval)?;
    store
        .input()
        .with_context(|| format!("cannot read {retrieval}"))
}

/// The vector at `retrieval`, or a fresh one tagged with the file name.
fn load_or_create(registry: &StoreRegistry, retrieval: &Retrieval) -> anyhow::Result<Arc<Vector>> {
    let mut store = registry.open(retrieval)?;
    match store.input() {
        Ok(vector) => Ok(vector),
        Err(StoreError::NotFound(path)) => {
            debug!(path = %path.display(), "creating new vector");
            let tag = retrieval.parts().last().cloned().unwrap_or_default();
            Ok(Arc::new(Vector::new(tag)))
        }
        Err(e) => Err(e).with_context(|| format!("cannot read {retrieval}")),
    }
}

fn save(registry: &StoreRegistry, vector: &Arc<Vector>, retrieval: &Retrieval) -> anyhow::Result<()> {
    // Printed output stays free of the address item.
    if retrieval.format() != STDOUT {
        retrieval.attach(vector);
    }
    let mut store = registry.open(retrieval)?;
    store.swap(Arc::clone(vector));
    store
        .out()
        .with_context(|| format!("cannot write {retrieval}"))
}

fn set_value(
    registry: &StoreRegistry,
    retrieval: &Retrieval,
    key: &str,
    value: Value,
) -> anyhow::Result<Arc<Vector>> {
    let vector = load_or_create(registry, retrieval)?;
    vector.set([Item::new(key, value)]);
    save(registry, &vector, retrieval)?;
    Ok(vector)
}

fn delete_key(
    registry: &StoreRegistry,
    retrieval: &Retrieval,
    key: &str,
    subtree: bool,
) -> anyhow::Result<bool> {
    let vector = load(registry, retrieval)?;
    let removed = if subtree {
        vector.remove_prefix(key)
    } else {
        vector.remove(key).is_some()
    };
    if removed {
        save(registry, &vector, retrieval)?;
    }
    Ok(removed)
}

/// Copies the vector at `from` to `to`, returning its item count.
fn convert(registry: &StoreRegistry, from: &Retrieval, to: &Retrieval) -> anyhow::Result<usize> {
    let vector = load(registry, from)?;
    save(registry, &vector, to)?;
    Ok(vector.len())
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

fn parse_value(kind: ValueKind, raw: &str) -> anyhow::Result<Value> {
    let value = match kind {
        ValueKind::String => Value::from(raw),
        ValueKind::Strings => Value::from(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>(),
        ),
        ValueKind::Bool => Value::from(
            raw.trim()
                .parse::<bool>()
                .with_context(|| format!("{raw:?} is not a bool"))?,
        ),
        ValueKind::Int => {
            let n: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{raw:?} is not an integer"))?;
            infer(serde_json::Value::from(n))
        }
        ValueKind::Float => Value::from(
            raw.trim()
                .parse::<f64>()
                .with_context(|| format!("{raw:?} is not a number"))?,
        ),
        ValueKind::Json => infer(
            serde_json::from_str(raw).with_context(|| format!("{raw:?} is not valid JSON"))?,
        ),
    };
    Ok(value)
}

/// Strings print bare, everything else as wire JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_wire().to_string(),
    }
}
