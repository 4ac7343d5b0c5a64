use std::path::Path;

use tracing::{debug, warn};

use tablewright_core::{
    BaseKind, ClassDef, ColumnDefinition, Datatype, DatatypeBase, Error, LiteralTypeDef, Range,
    Result, SlotDef, TableArtifact, TableSchemaDocument, Titles, CSVW_CONTEXT, expand_curie,
    prefix_uri, resolve_reference,
};

use crate::context::{ClassAccumulator, CompileContext};
use crate::foreign::{Enforcement, RelationNaming, RelationTarget, plan_relation};
use crate::triples::virtual_columns_for_template;
use crate::types::slot_datatype;

const RDF_TYPE: &str = "rdf:type";
const SCHEMA_ORG: &str = "https://schema.org/";
const INPUT_METADATA_FRAGMENT: &str = "#input-metadata";
const INPUT_METADATA_CLASS: &str = "InputMetadataDescription";

/// A class compiled into its table artifact, with the direct dependencies
/// the closure starts from.
#[derive(Debug, Clone)]
pub struct CompiledTable {
    pub artifact: TableArtifact,
    pub accumulator: ClassAccumulator,
}

/// Build every column of `class`, then its virtual columns and table schema.
pub fn compile_table(ctx: &CompileContext<'_>, class: &ClassDef) -> Result<CompiledTable> {
    let slots = ctx.view.effective_slots(&class.name)?;
    let identifier = ctx.view.identifier_slot(&class.name)?;
    let row_template = ctx.row_template(&identifier.name);

    let csv_path = ctx.layout.csv_path(&class.name);
    let mut acc = ClassAccumulator::default();
    acc.dependencies.insert(csv_path.clone());

    let builder = ColumnBuilder {
        ctx,
        class,
        row_template: &row_template,
        csv_path: &csv_path,
    };

    let mut columns = Vec::with_capacity(slots.len() + 4);
    for slot in slots {
        columns.push(builder.build(slot, &mut acc)?);
    }
    let header: Vec<String> = slots.iter().map(|slot| slot.column_title()).collect();

    columns.extend(builder.virtual_columns(slots)?);

    debug!(
        class = %class.name,
        columns = columns.len(),
        foreign_keys = acc.foreign_keys.len(),
        manual_checks = acc.manual_checks.len(),
        "columns built"
    );

    let schema = TableSchemaDocument {
        context: CSVW_CONTEXT.to_string(),
        columns,
        about_url: row_template.clone(),
        primary_key: acc.primary_key.clone(),
        foreign_keys: Some(acc.foreign_keys.clone()),
    };

    let artifact = TableArtifact {
        class_name: class.name.clone(),
        schema_path: ctx.layout.schema_path(&class.name),
        metadata_path: ctx.layout.metadata_path(&class.name),
        csv_path,
        header,
        schema,
        manual_checks: acc.manual_checks.clone(),
    };

    Ok(CompiledTable {
        artifact,
        accumulator: acc,
    })
}

struct ColumnBuilder<'c, 'a> {
    ctx: &'c CompileContext<'a>,
    class: &'c ClassDef,
    row_template: &'c str,
    csv_path: &'c Path,
}

impl ColumnBuilder<'_, '_> {
    fn build(&self, slot: &SlotDef, acc: &mut ClassAccumulator) -> Result<ColumnDefinition> {
        let prefixes = self.ctx.view.prefixes();
        let title = slot.column_title();

        let mut column = ColumnDefinition {
            name: Some(slot.name.clone()),
            titles: Some(Titles::single(title.clone())),
            required: slot.required,
            ..ColumnDefinition::default()
        };

        if slot.identifier {
            acc.primary_key.push(slot.name.clone());
        }

        match slot.slot_uri.as_deref() {
            Some(uri) => column.property_url = Some(expand_curie(uri, prefixes)?),
            None => column.suppress_output = true,
        }

        if self.ctx.options.input_metadata_slots.contains(&slot.name) {
            column.about_url = Some(format!("{}{INPUT_METADATA_FRAGMENT}", self.row_template));
        }
        if let Some(reference) = slot.about_url_override() {
            column.about_url = Some(resolve_reference(self.row_template, reference));
        }

        if let Some(target) = self.relation_target(slot)? {
            self.relation_column(slot, &title, &target, &mut column, acc)?;
        } else {
            match self.ctx.view.range_of(slot) {
                Range::Literal(literal) => self.literal_column(slot, literal, &mut column)?,
                Range::Class(_) | Range::Unresolved => {
                    return Err(Error::integrity(format!(
                        "slot '{}' of {} has unresolved range '{}'",
                        slot.name, self.class.name, slot.range
                    )));
                }
            }
        }

        Ok(column)
    }

    /// Parent table of a relational slot, or `None` for literal ranges.
    /// Synthetic tables win over classes of the same name.
    fn relation_target(&self, slot: &SlotDef) -> Result<Option<RelationTarget>> {
        if let Some(synthetic) = self.ctx.synthetic_table(&slot.range) {
            return Ok(Some(RelationTarget {
                table: synthetic.path.clone(),
                id_column: synthetic.id_column.clone(),
                id_title: synthetic.id_title.clone(),
            }));
        }

        let Range::Class(target) = self.ctx.view.range_of(slot) else {
            return Ok(None);
        };
        if target.is_abstract {
            return Err(Error::integrity(format!(
                "slot '{}' of {} references abstract class '{}' which is not a registered synthetic table",
                slot.name, self.class.name, target.name
            )));
        }
        let target_identifier = self.ctx.view.identifier_slot(&target.name)?;
        Ok(Some(RelationTarget {
            table: self.ctx.layout.csv_path(&target.name),
            id_column: target_identifier.name.clone(),
            id_title: target_identifier.column_title(),
        }))
    }

    fn relation_column(
        &self,
        slot: &SlotDef,
        title: &str,
        target: &RelationTarget,
        column: &mut ColumnDefinition,
        acc: &mut ClassAccumulator,
    ) -> Result<()> {
        if let Some(prefix) = slot.implicit_prefix.as_deref() {
            if slot.multivalued {
                return Err(Error::integrity(format!(
                    "implicit_prefix '{prefix}' on multivalued slot '{}' is not supported",
                    slot.name
                )));
            }
            // Relation cells hold row identifiers; the namespace template wins.
            warn!(
                slot = %slot.name,
                prefix,
                "implicit_prefix ignored on relational slot"
            );
        }

        acc.dependencies.insert(target.table.clone());

        let parent_url = self.ctx.layout.url_from_remote(&target.table);
        let plan = plan_relation(
            slot,
            self.csv_path,
            title,
            target,
            RelationNaming {
                identifier_namespace: self.ctx.namespace(),
                separator: &self.ctx.options.separator,
                parent_url: &parent_url,
            },
        );

        column.value_url = plan.value_url;
        column.separator = plan.separator;
        column.datatype = plan.datatype;
        match plan.enforcement {
            Enforcement::Declarative(fk) => acc.foreign_keys.push(fk),
            Enforcement::Manual(check) => acc.manual_checks.push(check),
        }
        Ok(())
    }

    fn literal_column(
        &self,
        slot: &SlotDef,
        literal: &LiteralTypeDef,
        column: &mut ColumnDefinition,
    ) -> Result<()> {
        let prefixes = self.ctx.view.prefixes();
        let kind = literal.base_kind()?;

        if slot.multivalued {
            if let Some(prefix) = slot.implicit_prefix.as_deref() {
                return Err(Error::integrity(format!(
                    "implicit_prefix '{prefix}' on multivalued slot '{}' is not supported",
                    slot.name
                )));
            }
        }

        let prefixed_template = match slot.implicit_prefix.as_deref() {
            Some(prefix) => Some(format!("{}{{+{}}}", prefix_uri(prefix, prefixes)?, slot.name)),
            None => None,
        };

        // Single-valued URIs with a predicate become node references.
        if kind == BaseKind::Uri && slot.slot_uri.is_some() && !slot.multivalued {
            column.value_url =
                Some(prefixed_template.unwrap_or_else(|| format!("{{+{}}}", slot.name)));
            column.datatype = slot.pattern.as_ref().map(|pattern| Datatype {
                format: Some(pattern.clone()),
                ..Datatype::base(DatatypeBase::String)
            });
            return Ok(());
        }

        column.datatype = Some(slot_datatype(
            slot,
            literal,
            prefixes,
            self.ctx.namespace(),
        )?);
        if slot.multivalued {
            column.separator = Some(self.ctx.options.separator.clone());
        }
        column.value_url = prefixed_template;
        Ok(())
    }

    fn virtual_columns(&self, slots: &[&SlotDef]) -> Result<Vec<ColumnDefinition>> {
        let namespace = self.ctx.namespace();
        let input_metadata = format!("{}{INPUT_METADATA_FRAGMENT}", self.row_template);
        let mut columns = Vec::new();

        if !slots.iter().any(|slot| slot.designates_type) {
            columns.push(ColumnDefinition::virtual_triple(
                None,
                RDF_TYPE,
                self.class_uri()?,
            ));
        }

        columns.push(ColumnDefinition::virtual_triple(
            Some(input_metadata.clone()),
            RDF_TYPE,
            format!("{SCHEMA_ORG}DataDownload"),
        ));
        columns.push(ColumnDefinition::virtual_triple(
            Some(input_metadata.clone()),
            RDF_TYPE,
            format!("{namespace}{INPUT_METADATA_CLASS}"),
        ));
        columns.push(ColumnDefinition::virtual_triple(
            Some(input_metadata.clone()),
            format!("{SCHEMA_ORG}about"),
            self.row_template,
        ));

        match self.ctx.options.content_urls.get(&self.class.name) {
            Some(url) => columns.push(ColumnDefinition::virtual_triple(
                Some(input_metadata),
                format!("{SCHEMA_ORG}contentUrl"),
                format!("{url}#row={{_row}}"),
            )),
            None if self.ctx.options.require_content_urls => {
                return Err(Error::integrity(format!(
                    "no content URL configured for class '{}'",
                    self.class.name
                )));
            }
            None => {}
        }

        for template in self.class.virtual_triples() {
            columns.extend(virtual_columns_for_template(
                template,
                self.ctx.view.prefixes(),
                namespace,
                self.row_template,
            )?);
        }

        Ok(columns)
    }

    /// Expanded class URI, falling back to `<default_prefix><Name>`.
    fn class_uri(&self) -> Result<String> {
        let prefixes = self.ctx.view.prefixes();
        if let Some(uri) = self.class.class_uri.as_deref() {
            return expand_curie(uri, prefixes);
        }
        match self.ctx.view.default_prefix() {
            Some(prefix) => Ok(format!("{}{}", prefix_uri(prefix, prefixes)?, self.class.name)),
            None => Err(Error::integrity(format!(
                "class '{}' has no class_uri and the schema has no default_prefix",
                self.class.name
            ))),
        }
    }
}
