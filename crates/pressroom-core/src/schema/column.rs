use serde::{Deserialize, Serialize};

use crate::schema::{
    default::DefaultValue,
    foreign_key::ForeignKeySyntax,
    names::ColumnName,
    primary_key::PrimaryKeySyntax,
    str_or_bool::StrOrBoolOrArray,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub struct ColumnDef {
    pub name: ColumnName,
    pub r#type: ColumnType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKeySyntax>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<StrOrBoolOrArray>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<StrOrBoolOrArray>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeySyntax>,
}

impl ColumnDef {
    /// A required column with no constraints attached.
    pub fn new(name: impl Into<ColumnName>, r#type: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
            nullable: false,
            default: None,
            comment: None,
            primary_key: None,
            unique: None,
            index: None,
            foreign_key: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = Some(PrimaryKeySyntax::Bool(true));
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = Some(StrOrBoolOrArray::Bool(true));
        self
    }

    pub fn index(mut self) -> Self {
        self.index = Some(StrOrBoolOrArray::Bool(true));
        self
    }

    /// Inline `"table.column"` reference.
    pub fn foreign_key(mut self, reference: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKeySyntax::Reference(reference.into()));
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(PrimaryKeySyntax::is_primary_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case", untagged)]
pub enum ColumnType {
    Simple(SimpleColumnType),
    Complex(ComplexColumnType),
}

impl ColumnType {
    pub fn varchar(length: u32) -> Self {
        ColumnType::Complex(ComplexColumnType::Varchar { length })
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnType::Complex(ComplexColumnType::Enum {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Returns true if this type supports auto_increment (integer types only)
    pub fn supports_auto_increment(&self) -> bool {
        match self {
            ColumnType::Simple(ty) => ty.supports_auto_increment(),
            ColumnType::Complex(_) => false,
        }
    }

    /// Rust type used for this column in generated SeaORM entities.
    pub fn to_rust_type(&self, nullable: bool) -> String {
        let base = match self {
            ColumnType::Simple(ty) => match ty {
                SimpleColumnType::SmallInt => "i16",
                SimpleColumnType::Integer => "i32",
                SimpleColumnType::BigInt => "i64",
                SimpleColumnType::Real => "f32",
                SimpleColumnType::DoublePrecision => "f64",
                SimpleColumnType::Text => "String",
                SimpleColumnType::Boolean => "bool",
                SimpleColumnType::Date => "Date",
                SimpleColumnType::Time => "Time",
                SimpleColumnType::Timestamp => "DateTime",
                SimpleColumnType::Timestamptz => "DateTimeWithTimeZone",
                SimpleColumnType::Bytea => "Vec<u8>",
                SimpleColumnType::Uuid => "Uuid",
                SimpleColumnType::Json => "Json",
            },
            ColumnType::Complex(ty) => match ty {
                ComplexColumnType::Varchar { .. } | ComplexColumnType::Char { .. } => "String",
                ComplexColumnType::Numeric { .. } => "Decimal",
                ComplexColumnType::Custom { .. } => "String",
                ComplexColumnType::Enum { .. } => "String",
            },
        };

        if nullable {
            format!("Option<{}>", base)
        } else {
            base.to_string()
        }
    }

    /// Literal set of an enum column, `None` for every other type.
    pub fn enum_values(&self) -> Option<&[String]> {
        match self {
            ColumnType::Complex(ComplexColumnType::Enum { values, .. }) => Some(values),
            _ => None,
        }
    }

    pub fn enum_name(&self) -> Option<&str> {
        match self {
            ColumnType::Complex(ComplexColumnType::Enum { name, .. }) => Some(name),
            _ => None,
        }
    }

    /// Whether `literal` is a storable value of this type. Only enums restrict
    /// their values here; other types accept anything.
    pub fn accepts(&self, literal: &str) -> bool {
        match self.enum_values() {
            Some(values) => values.iter().any(|v| v == literal),
            None => true,
        }
    }
}

impl From<SimpleColumnType> for ColumnType {
    fn from(ty: SimpleColumnType) -> Self {
        ColumnType::Simple(ty)
    }
}

impl From<ComplexColumnType> for ColumnType {
    fn from(ty: ComplexColumnType) -> Self {
        ColumnType::Complex(ty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum SimpleColumnType {
    SmallInt,
    Integer,
    BigInt,
    Real,
    DoublePrecision,

    Text,
    Boolean,

    Date,
    Time,
    Timestamp,
    Timestamptz,

    Bytea,
    Uuid,
    Json,
}

impl SimpleColumnType {
    pub fn supports_auto_increment(&self) -> bool {
        matches!(
            self,
            SimpleColumnType::SmallInt | SimpleColumnType::Integer | SimpleColumnType::BigInt
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ComplexColumnType {
    Varchar { length: u32 },
    Numeric { precision: u32, scale: u32 },
    Char { length: u32 },
    Custom { custom_type: String },
    /// String enum. `name` is local to the table; database type names are
    /// derived from it together with the table name.
    Enum { name: String, values: Vec<String> },
}
