use std::collections::HashMap;

use sdd_rs::logic::{exists, forall_many, iff, implies};
use sdd_rs::manager::{GcMode, Manager};
use sdd_rs::types::{Literal, Variable};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mgr = Manager::new(3, GcMode::Enabled)?;
    println!("mgr = {:?}", mgr);

    let x1 = mgr.literal(Literal::new(1))?;
    let x2 = mgr.literal(Literal::new(2))?;
    let x3 = mgr.literal(Literal::new(3))?;
    println!("x1 = {}, ~x2 = {}", x1, x2.negate());

    let f = &(&x1 & &x2) | &x3;
    println!("f = {} ({:?})", f, f.kind());
    println!("f has {} decision nodes and {} elements", f.count(), f.size());
    println!("#models(f) = {}", f.model_count());

    for (i, element) in f.elements().iter().enumerate() {
        println!("  element {}: ({}, {})", i, element.prime(), element.sub());
    }

    println!("exists x1. f = {}", exists(Variable::new(1), &f));
    println!(
        "forall x1,x2. f = {}",
        forall_many([Variable::new(1), Variable::new(2)], &f)
    );
    println!("x1 & x2 -> f is valid: {}", implies(&(&x1 & &x2), &f).is_valid());
    println!("f <-> f is valid: {}", iff(&f, &f).is_valid());

    if let Some(model) = f.model() {
        let shown: Vec<String> = model.iter().map(|l| l.to_string()).collect();
        println!("model = [{}]", shown.join(", "));
    }
    println!("value of x3 in f & ~x1: {:?}", (&f & &!&x1).value(Literal::new(3)));

    let swap: HashMap<Variable, Variable> = [
        (Variable::new(1), Variable::new(3)),
        (Variable::new(3), Variable::new(1)),
    ]
    .into_iter()
    .collect();
    println!("f[x1 <-> x3] = {}", f.rename_map(&swap));

    let x4 = mgr.add_var_after_last();
    println!("added {}, order = {:?}", x4, mgr.var_order());

    drop(f);
    println!("freed {} nodes", mgr.garbage_collect());
    println!("live = {}, cache (hits, misses) = {:?}", mgr.live_count(), mgr.cache_stats());

    Ok(())
}
