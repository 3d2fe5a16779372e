use super::super::args::{ArchiveArgs, ArchiveSub, ExportArgs, InspectArgs, OutputFormat};
use super::super::helpers;
use super::render::ArchiveSummary;
use crate::exit_codes;
use anyhow::Context;
use factscope_archive::{render_viewer_page, Archive, FactRecord, VIEWER_FILE_NAME, VIEWER_TEMPLATE};
use tracing::info;

pub async fn run(args: ArchiveArgs) -> anyhow::Result<i32> {
    match args.cmd {
        ArchiveSub::Inspect(a) => cmd_inspect(a).await,
        ArchiveSub::Export(a) => cmd_export(a).await,
    }
}

/// 0 when the full view (including provenance) was built, 1 otherwise.
fn exit_code_for(archive: &Archive) -> i32 {
    if archive.details.is_some() {
        exit_codes::EXIT_SUCCESS
    } else {
        exit_codes::EXIT_UNAVAILABLE
    }
}

async fn cmd_inspect(args: InspectArgs) -> anyhow::Result<i32> {
    let storage_urn =
        helpers::resolve_storage_urn(args.storage_urn.as_deref(), args.bundle.as_deref())?;
    let service = helpers::build_service(args.bundle.as_deref(), &args.interpret, &args.remote)?;

    let mut fact = FactRecord::new(args.fact_urn.unwrap_or_default(), storage_urn);
    fact.network = args.interpret.network.clone();

    let archive = service
        .get_archive(&fact, &args.interpret.network, &args.interpret.source_type)
        .await;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&archive)?),
        OutputFormat::Text => print!("{}", ArchiveSummary(&archive)),
    }

    Ok(exit_code_for(&archive))
}

async fn cmd_export(args: ExportArgs) -> anyhow::Result<i32> {
    let storage_urn =
        helpers::resolve_storage_urn(args.storage_urn.as_deref(), args.bundle.as_deref())?;

    let template = match &args.template {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read template: {}", path.display()))?,
        None => VIEWER_TEMPLATE.to_string(),
    };

    let service = helpers::build_service(args.bundle.as_deref(), &args.interpret, &args.remote)?;
    let Some(download) = service
        .get_archive_download(&storage_urn, &args.interpret.network, &args.interpret.source_type)
        .await
    else {
        eprintln!("archive not found: {}", storage_urn);
        return Ok(exit_codes::EXIT_UNAVAILABLE);
    };

    let page = render_viewer_page(&template, &download)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    let written = crate::fs::write_entries(&args.out, &download.entries)
        .with_context(|| format!("failed to write entries under {}", args.out.display()))?;
    let viewer_path = args.out.join(VIEWER_FILE_NAME);
    std::fs::write(&viewer_path, page)
        .with_context(|| format!("failed to write {}", viewer_path.display()))?;

    info!(
        storage_urn = %storage_urn,
        files = written,
        out = %args.out.display(),
        details = download.details.is_some(),
        "archive exported"
    );
    eprintln!(
        "exported {} files and {} to {}",
        written,
        VIEWER_FILE_NAME,
        args.out.display()
    );

    Ok(if download.details.is_some() {
        exit_codes::EXIT_SUCCESS
    } else {
        exit_codes::EXIT_UNAVAILABLE
    })
}
