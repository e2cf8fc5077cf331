use anyhow::{Context, Result};
use clap::Parser;
use discret_explorer_core::{
    charts, load_results_with, tally_by_kind, DiscretizerKind, Explorer, FilterConfig,
    GroupDimension, NamingConvention, Selection, SortDirection,
};
use serde_json;
use std::fs;
use tracing::{info, Level};
use tracing_subscriber;

#[derive(Parser)]
#[command(name = "discret_explorer")]
#[command(about = "Explore les résultats d'expériences de discrétisation locale à partir d'un document JSON")]
struct Args {
    /// Document de résultats JSON
    #[arg(short, long)]
    data: String,

    /// Fichier de sortie JSON
    #[arg(short, long)]
    out: String,

    /// Convention de nommage héritée (-efd3/-ewd3) au lieu de -bin3q/-bin3u
    #[arg(long)]
    legacy_names: bool,

    /// Sous-chaîne recherchée dans les noms de dataset
    #[arg(long, default_value = "")]
    search: String,

    /// Budget d'itérations retenu (10it, 100it); tous si absent
    #[arg(long)]
    iterations: Option<String>,

    /// Points de coupe retenus, séparés par des virgules (3p,4p,5p,up); tous si absent
    #[arg(long, value_delimiter = ',')]
    cuts: Vec<String>,

    /// Classificateurs retenus (TAN,KDB,AODE); tous si absent
    #[arg(long, value_delimiter = ',')]
    model_base: Vec<String>,

    /// Types de discrétisation retenus (local,mdlp,equal_freq,equal_width,pki); tous si absent
    #[arg(long, value_delimiter = ',')]
    disc_type: Vec<String>,

    /// Ne garder que les locaux à amélioration strictement positive
    #[arg(long)]
    only_improvements: bool,

    /// Colonne de tri
    #[arg(long, default_value = "accuracy")]
    sort: String,

    /// Tri croissant (décroissant par défaut)
    #[arg(long)]
    asc: bool,

    /// Taille de page
    #[arg(long, default_value = "50")]
    page_size: usize,

    /// Numéro de page
    #[arg(long, default_value = "1")]
    page: usize,

    /// Taille du palmarès des améliorations
    #[arg(long, default_value = "15")]
    top: usize,
}

fn build_filters(args: &Args) -> Result<FilterConfig> {
    let mut filters = FilterConfig {
        search: args.search.clone(),
        only_improvements: args.only_improvements,
        ..FilterConfig::default()
    };

    if let Some(it) = &args.iterations {
        filters.iterations = Selection::only([it.parse()?]);
    }
    if !args.cuts.is_empty() {
        let cuts: Result<Vec<_>, _> = args.cuts.iter().map(|c| c.parse()).collect();
        filters.cuts = Selection::only(cuts?);
    }
    if !args.model_base.is_empty() {
        let bases: Result<Vec<_>, _> = args.model_base.iter().map(|b| b.parse()).collect();
        filters.model_base = Selection::only(bases?);
    }
    if !args.disc_type.is_empty() {
        let kinds: Result<Vec<_>, _> = args.disc_type.iter().map(|d| d.parse()).collect();
        filters.discretization_type = Selection::only(kinds?);
    }

    Ok(filters)
}

fn main() -> Result<()> {
    // Initialiser le logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();

    let convention = if args.legacy_names {
        NamingConvention::EfdEwd
    } else {
        NamingConvention::BinQU
    };

    info!("Chargement du document de résultats: {}", args.data);
    let loaded = load_results_with(&args.data, convention)
        .with_context(|| format!("Échec du chargement: {}", args.data))?;
    info!(
        "{} résultats chargés, {} datasets",
        loaded.len(),
        loaded.datasets().len()
    );

    let mut explorer = Explorer::new()
        .with_convention(convention)
        .with_page_size(args.page_size);
    explorer.attach(Ok(loaded));
    explorer.set_filters(build_filters(&args)?);
    explorer.set_sort(
        args.sort.parse()?,
        if args.asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        },
    );
    explorer.set_page(args.page);

    let snapshot = explorer.snapshot().context("Pipeline d'exploration")?;
    info!(
        "{} résultats après filtrage, page {}/{}",
        snapshot.stats.total, snapshot.page_number, snapshot.page_count
    );

    let records = &snapshot.records;
    let tallies = serde_json::json!({
        "local_vs_mdlp": tally_by_kind(records, DiscretizerKind::Local, DiscretizerKind::Mdlp),
        "local_vs_equal_freq": tally_by_kind(records, DiscretizerKind::Local, DiscretizerKind::EqualFreq),
        "local_vs_equal_width": tally_by_kind(records, DiscretizerKind::Local, DiscretizerKind::EqualWidth),
        "local_vs_pki": tally_by_kind(records, DiscretizerKind::Local, DiscretizerKind::Pki),
    });

    let output = serde_json::json!({
        "metadata": explorer.data_state().result_set().map(|s| s.metadata().clone()),
        "stats": snapshot.stats,
        "page": {
            "number": snapshot.page_number,
            "count": snapshot.page_count,
            "records": &snapshot.page,
        },
        "results": &snapshot.records,
        "mean_accuracy": charts::mean_accuracy_by_base_and_kind(records),
        "summaries_by_base": charts::accuracy_summaries(records, GroupDimension::ModelBase),
        "tallies": tallies,
        "top_improvements": charts::top_improvements(records, args.top),
        "trend_by_cuts": charts::trend_by_cuts(records),
        "size_vs_improvement": charts::size_vs_improvement(records),
    });

    fs::write(&args.out, serde_json::to_string_pretty(&output)?)
        .with_context(|| format!("Échec de l'écriture du fichier: {}", args.out))?;

    info!("Rapport sauvegardé dans: {}", args.out);

    Ok(())
}
