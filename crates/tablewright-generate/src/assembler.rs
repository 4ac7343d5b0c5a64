use std::collections::BTreeSet;
use std::path::PathBuf;

use tablewright_core::{
    CSVW_CONTEXT, ColumnDefinition, DependencyGraph, MetadataDocument, TableArtifact,
    TableReference, TableSchemaDocument, Titles,
};

use crate::layout::Layout;
use crate::model::SyntheticTable;

/// Build the aggregate metadata document of `artifact`.
///
/// Class tables are listed in compile order, then synthetic tables in
/// registry order; only tables in the class's closed dependency set are
/// included. Every table but the class's own is output-suppressed.
pub fn assemble_metadata(
    artifact: &TableArtifact,
    artifacts: &[TableArtifact],
    synthetic_tables: &[SyntheticTable],
    graph: &DependencyGraph,
    layout: &Layout,
) -> MetadataDocument {
    let empty = BTreeSet::new();
    let dependencies = graph.dependencies(&artifact.class_name).unwrap_or(&empty);

    let mut tables = Vec::new();
    for dependency in artifacts {
        if dependencies.contains(&dependency.csv_path) {
            tables.push(TableReference {
                url: layout.url_from_remote(&dependency.csv_path),
                table_schema: layout.url_from_remote(&dependency.schema_path),
                suppress_output: dependency.csv_path != artifact.csv_path,
            });
        }
    }

    for synthetic in synthetic_tables {
        if dependencies.contains(&synthetic.path) {
            tables.push(TableReference {
                url: layout.url_from_remote(&synthetic.path),
                table_schema: layout.url_from_remote(&layout.remote_file(&synthetic.schema)),
                suppress_output: true,
            });
        }
    }

    MetadataDocument {
        context: CSVW_CONTEXT.to_string(),
        tables,
    }
}

/// One schema document per distinct synthetic schema file: a single
/// required, output-suppressed identifier column keyed into the row
/// namespace. Entries sharing a file take the first entry's column.
pub fn synthetic_schema_documents(
    synthetic_tables: &[SyntheticTable],
    identifier_namespace: &str,
    layout: &Layout,
) -> Vec<(PathBuf, TableSchemaDocument)> {
    let mut seen = BTreeSet::new();
    let mut documents = Vec::new();

    for synthetic in synthetic_tables {
        if !seen.insert(synthetic.schema.as_str()) {
            continue;
        }
        let column = ColumnDefinition {
            name: Some(synthetic.id_column.clone()),
            titles: Some(Titles::single(synthetic.id_title.clone())),
            required: true,
            suppress_output: true,
            ..ColumnDefinition::default()
        };
        documents.push((
            layout.remote_file(&synthetic.schema),
            TableSchemaDocument {
                context: CSVW_CONTEXT.to_string(),
                columns: vec![column],
                about_url: format!("{identifier_namespace}{{+{}}}", synthetic.id_column),
                primary_key: vec![synthetic.id_column.clone()],
                foreign_keys: None,
            },
        ));
    }

    documents
}
