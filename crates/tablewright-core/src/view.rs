use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::schema::{ClassDef, SchemaSource, SlotDef};
use crate::types::LiteralTypeDef;

/// What a slot's range name refers to.
#[derive(Debug, Clone, Copy)]
pub enum Range<'a> {
    Class(&'a ClassDef),
    Literal(&'a LiteralTypeDef),
    Unresolved,
}

/// Read-only, indexed view over a [`SchemaSource`].
///
/// Construction resolves every class's effective slot list once (parent
/// slots first, then own slots, without de-duplication) and rejects
/// duplicate names, unknown parents, unknown slots and cyclic `is_a` chains.
pub struct SchemaView<'a> {
    source: &'a dyn SchemaSource,
    classes: HashMap<&'a str, &'a ClassDef>,
    slots: HashMap<&'a str, &'a SlotDef>,
    literal_types: HashMap<&'a str, &'a LiteralTypeDef>,
    effective_slots: HashMap<&'a str, Vec<&'a SlotDef>>,
}

impl<'a> SchemaView<'a> {
    pub fn new(source: &'a dyn SchemaSource) -> Result<Self> {
        let classes = index_unique(source.classes(), |class| &class.name, "class")?;
        let slots = index_unique(source.slots(), |slot| &slot.name, "slot")?;
        let literal_types = index_unique(source.literal_types(), |ty| &ty.name, "literal type")?;

        let mut effective_slots = HashMap::new();
        for class in source.classes() {
            let mut visiting = Vec::new();
            resolve_effective_slots(
                class,
                &classes,
                &slots,
                &mut effective_slots,
                &mut visiting,
            )?;
        }

        Ok(Self {
            source,
            classes,
            slots,
            literal_types,
            effective_slots,
        })
    }

    pub fn name(&self) -> &'a str {
        self.source.name()
    }

    pub fn description(&self) -> Option<&'a str> {
        self.source.description()
    }

    pub fn default_prefix(&self) -> Option<&'a str> {
        self.source.default_prefix()
    }

    pub fn prefixes(&self) -> &'a BTreeMap<String, String> {
        self.source.prefixes()
    }

    /// Classes in schema enumeration order.
    pub fn classes(&self) -> &'a [ClassDef] {
        self.source.classes()
    }

    pub fn literal_types(&self) -> &'a [LiteralTypeDef] {
        self.source.literal_types()
    }

    pub fn class(&self, name: &str) -> Option<&'a ClassDef> {
        self.classes.get(name).copied()
    }

    pub fn slot(&self, name: &str) -> Option<&'a SlotDef> {
        self.slots.get(name).copied()
    }

    pub fn literal_type(&self, name: &str) -> Option<&'a LiteralTypeDef> {
        self.literal_types.get(name).copied()
    }

    /// Effective slots of `class_name`: the parent's effective slots followed
    /// by the class's own slots.
    pub fn effective_slots(&self, class_name: &str) -> Result<&[&'a SlotDef]> {
        self.effective_slots
            .get(class_name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::integrity(format!("unknown class '{class_name}'")))
    }

    /// The single identifier slot among the class's effective slots.
    pub fn identifier_slot(&self, class_name: &str) -> Result<&'a SlotDef> {
        let identifiers: Vec<&'a SlotDef> = self
            .effective_slots(class_name)?
            .iter()
            .copied()
            .filter(|slot| slot.identifier)
            .collect();

        match identifiers.as_slice() {
            [slot] => Ok(*slot),
            other => Err(Error::integrity(format!(
                "expected to find 1 identifier slot in {class_name} but found {}",
                other.len()
            ))),
        }
    }

    /// Classify a slot's range. Classes win over literal types of the same name.
    pub fn range_of(&self, slot: &SlotDef) -> Range<'a> {
        if let Some(class) = self.class(&slot.range) {
            Range::Class(class)
        } else if let Some(literal) = self.literal_type(&slot.range) {
            Range::Literal(literal)
        } else {
            Range::Unresolved
        }
    }

    /// Concrete classes that produce a table: not abstract, at least one slot.
    pub fn table_classes(&self) -> impl Iterator<Item = &'a ClassDef> + '_ {
        self.classes().iter().filter(move |class| {
            !class.is_abstract
                && self
                    .effective_slots
                    .get(class.name.as_str())
                    .is_some_and(|slots| !slots.is_empty())
        })
    }
}

fn index_unique<'a, T>(
    items: &'a [T],
    key: impl Fn(&'a T) -> &'a String,
    kind: &str,
) -> Result<HashMap<&'a str, &'a T>> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        let name = key(item).as_str();
        if index.insert(name, item).is_some() {
            return Err(Error::integrity(format!("duplicate {kind} name: {name}")));
        }
    }
    Ok(index)
}

fn resolve_effective_slots<'a>(
    class: &'a ClassDef,
    classes: &HashMap<&'a str, &'a ClassDef>,
    slots: &HashMap<&'a str, &'a SlotDef>,
    resolved: &mut HashMap<&'a str, Vec<&'a SlotDef>>,
    visiting: &mut Vec<&'a str>,
) -> Result<()> {
    let name = class.name.as_str();
    if resolved.contains_key(name) {
        return Ok(());
    }
    if visiting.contains(&name) {
        let mut chain = visiting.clone();
        chain.push(name);
        return Err(Error::integrity(format!(
            "cyclic inheritance: {}",
            chain.join(" -> ")
        )));
    }

    visiting.push(name);

    let mut effective = Vec::new();
    if let Some(parent_name) = class.is_a.as_deref() {
        let parent = classes.get(parent_name).copied().ok_or_else(|| {
            Error::integrity(format!(
                "class '{name}' inherits from unknown class '{parent_name}'"
            ))
        })?;
        resolve_effective_slots(parent, classes, slots, resolved, visiting)?;
        if let Some(inherited) = resolved.get(parent.name.as_str()) {
            effective.extend(inherited.iter().copied());
        }
    }

    for slot_name in &class.slots {
        let slot = slots.get(slot_name.as_str()).copied().ok_or_else(|| {
            Error::integrity(format!(
                "class '{name}' declares unknown slot '{slot_name}'"
            ))
        })?;
        effective.push(slot);
    }

    visiting.pop();
    resolved.insert(name, effective);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaModel;

    fn model(classes: Vec<ClassDef>, slots: Vec<SlotDef>) -> SchemaModel {
        SchemaModel {
            name: "test".to_string(),
            types: vec![LiteralTypeDef::new("string", "str")],
            classes,
            slots,
            ..SchemaModel::default()
        }
    }

    fn id_slot() -> SlotDef {
        SlotDef {
            identifier: true,
            required: true,
            ..SlotDef::new("id", "string")
        }
    }

    #[test]
    fn inherited_slots_come_first_without_dedup() {
        let mut child = ClassDef::new("Child", &["name", "id"]);
        child.is_a = Some("Parent".to_string());
        let mut grandchild = ClassDef::new("Grandchild", &["extra"]);
        grandchild.is_a = Some("Child".to_string());

        let schema = model(
            vec![
                grandchild,
                child,
                ClassDef::new("Parent", &["id"]),
            ],
            vec![
                id_slot(),
                SlotDef::new("name", "string"),
                SlotDef::new("extra", "string"),
            ],
        );
        let view = SchemaView::new(&schema).expect("build view");

        let names: Vec<&str> = view
            .effective_slots("Grandchild")
            .unwrap()
            .iter()
            .map(|slot| slot.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "name", "id", "extra"]);
    }

    #[test]
    fn cyclic_inheritance_is_rejected() {
        let mut a = ClassDef::new("A", &[]);
        a.is_a = Some("B".to_string());
        let mut b = ClassDef::new("B", &[]);
        b.is_a = Some("A".to_string());

        let schema = model(vec![a, b], Vec::new());
        let err = SchemaView::new(&schema).err().expect("cycle must fail");
        assert!(err.to_string().contains("cyclic inheritance"));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut orphan = ClassDef::new("Orphan", &[]);
        orphan.is_a = Some("Missing".to_string());
        let schema = model(vec![orphan], Vec::new());
        let err = SchemaView::new(&schema).err().expect("unknown parent must fail");
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn duplicate_class_names_are_rejected() {
        let schema = model(
            vec![ClassDef::new("A", &[]), ClassDef::new("A", &[])],
            Vec::new(),
        );
        assert!(SchemaView::new(&schema).is_err());
    }

    #[test]
    fn identifier_slot_requires_exactly_one() {
        let mut second = id_slot();
        second.name = "other_id".to_string();
        let schema = model(
            vec![
                ClassDef::new("Ok", &["id"]),
                ClassDef::new("Twice", &["id", "other_id"]),
                ClassDef::new("None", &["name"]),
            ],
            vec![id_slot(), second, SlotDef::new("name", "string")],
        );
        let view = SchemaView::new(&schema).expect("build view");

        assert_eq!(view.identifier_slot("Ok").unwrap().name, "id");
        assert!(view.identifier_slot("Twice").unwrap_err().to_string().contains("found 2"));
        assert!(view.identifier_slot("None").unwrap_err().to_string().contains("found 0"));
    }

    #[test]
    fn table_classes_skip_abstract_and_empty() {
        let mut base = ClassDef::new("Base", &["id"]);
        base.is_abstract = true;
        let schema = model(
            vec![base, ClassDef::new("Empty", &[]), ClassDef::new("Real", &["id"])],
            vec![id_slot()],
        );
        let view = SchemaView::new(&schema).expect("build view");
        let names: Vec<&str> = view.table_classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Real"]);
    }
}
