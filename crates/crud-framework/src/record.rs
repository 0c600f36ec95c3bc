//! # Record Trait
//!
//! The `Record` trait is the contract every persisted type must satisfy to be served by
//! the generic [`CrudService`](crate::CrudService). It names the identifier type, the
//! partial input type used by every mutating operation, and the shallow merge that
//! overlays a partial input onto a record.
//!
//! # Associated Types
//! A `User` record is mutated with a `UserPartial` and can't accidentally be handed a
//! `ProductPartial`. The compiler keeps every service honest about which shape it accepts.
//!
//! Most records are declared with the [`record!`](crate::record!) macro, which writes the
//! partial struct and this impl for you.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any persisted type must implement to be managed by a `CrudService`.
pub trait Record: Clone + Debug + Default + Send + Sync + 'static {
    /// The unique identifier, assigned by the persistence backend on first save.
    /// Must be constructible from `u64` so backends can allocate identifiers.
    type Id: Copy + Eq + Ord + Hash + Send + Sync + Display + Debug + From<u64>;

    /// A structurally partial representation of the record: zero or more of its fields.
    /// `Default` must produce the empty partial.
    type Partial: Clone + Debug + Default + Send + Sync;

    /// The identifier, or `None` while the record has never been saved.
    fn id(&self) -> Option<Self::Id>;

    fn set_id(&mut self, id: Self::Id);

    /// Overwrites every field present in `partial`. Fields absent from `partial`
    /// keep their current value. Nested values are replaced, not merged.
    fn merge(&mut self, partial: Self::Partial);

    /// Builds a fresh, not yet persisted record: the type's defaults overlaid with `partial`.
    fn from_partial(partial: Self::Partial) -> Self {
        let mut record = Self::default();
        record.merge(partial);
        record
    }
}

/// Short type name of `T` (e.g. `"User"` instead of `"crud_recipe::model::user::User"`).
/// Generic parameters are dropped: `Wrapper<Inner>` is `"Wrapper"`.
pub fn entity_name<T>() -> &'static str {
    let path = std::any::type_name::<T>();
    let path = path.split('<').next().unwrap_or(path);
    path.rsplit("::").next().unwrap_or("Unknown")
}

/// Deserializes a present field as `Some`, keeping a `null` distinct from an absent key.
#[doc(hidden)]
pub fn supplied<'de, D, V>(deserializer: D) -> Result<Option<V>, D::Error>
where
    D: serde::Deserializer<'de>,
    V: serde::Deserialize<'de>,
{
    V::deserialize(deserializer).map(Some)
}

/// Declares a record struct, its `<Name>Partial` input struct and the [`Record`] impl.
///
/// The first field must be `id: <IdType>`; it becomes `id: Option<IdType>` on the
/// record. Any other field may carry a default expression (`= expr`); fields without
/// one use `Default::default()`. Outer attributes are applied to both structs.
///
/// Starting the declaration with `#[record(serde)]` derives `Serialize` and `Deserialize`
/// (with `#[serde(default)]`) on both structs. Partial fields then read `null` as a
/// supplied value, so `"age": null` on an `Option` field becomes `Some(None)` and clears
/// it on merge, while an absent key stays `None`. The calling crate must depend on
/// `serde`.
///
/// ```rust
/// use crud_framework::{record, Record};
///
/// record! {
///     pub struct Book {
///         id: u64,
///         pub title: String,
///         pub pages: u32 = 100,
///     }
/// }
///
/// let book = Book::from_partial(BookPartial {
///     title: Some("Dune".into()),
///     ..Default::default()
/// });
/// assert_eq!(book.id, None);
/// assert_eq!(book.title, "Dune");
/// assert_eq!(book.pages, 100);
/// ```
#[macro_export]
macro_rules! record {
    (
        #[record(serde)]
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            id: $id:ty,
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $crate::record! {
            @emit
            [
                $(#[$meta])*
                #[derive(::serde::Serialize, ::serde::Deserialize)]
                #[serde(default)]
            ]
            $vis struct $name {
                id: $id,
                $(
                    [#[serde(
                        deserialize_with = "crud_framework::record::supplied",
                        skip_serializing_if = "Option::is_none"
                    )]]
                    $(#[$fmeta])*
                    $fvis $field : $fty $(= $default)?
                ),*
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            id: $id:ty,
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $crate::record! {
            @emit
            [$(#[$meta])*]
            $vis struct $name {
                id: $id,
                $(
                    []
                    $(#[$fmeta])*
                    $fvis $field : $fty $(= $default)?
                ),*
            }
        }
    };
    (
        @emit
        [$($meta:tt)*]
        $vis:vis struct $name:ident {
            id: $id:ty,
            $(
                [$($pmeta:tt)*]
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $(= $default:expr)?
            ),*
        }
    ) => {
        $crate::__paste::paste! {
            $($meta)*
            #[derive(Debug, Clone, PartialEq)]
            $vis struct $name {
                pub id: Option<$id>,
                $(
                    $(#[$fmeta])*
                    $fvis $field: $fty,
                )*
            }

            impl Default for $name {
                fn default() -> Self {
                    Self {
                        id: None,
                        $( $field: $crate::record!(@default $($default)?), )*
                    }
                }
            }

            $($meta)*
            #[doc = concat!("Partial input for [`", stringify!($name), "`]. `None` means \"not supplied\".")]
            #[derive(Debug, Clone, Default, PartialEq)]
            $vis struct [<$name Partial>] {
                pub id: Option<$id>,
                $(
                    $($pmeta)*
                    pub $field: Option<$fty>,
                )*
            }

            impl $crate::Record for $name {
                type Id = $id;
                type Partial = [<$name Partial>];

                fn id(&self) -> Option<$id> {
                    self.id
                }

                fn set_id(&mut self, id: $id) {
                    self.id = Some(id);
                }

                fn merge(&mut self, partial: [<$name Partial>]) {
                    if let Some(id) = partial.id {
                        self.id = Some(id);
                    }
                    $(
                        if let Some(value) = partial.$field {
                            self.$field = value;
                        }
                    )*
                }
            }
        }
    };
    (@default) => { ::core::default::Default::default() };
    (@default $default:expr) => { $default };
}

#[cfg(test)]
mod tests {
    use super::*;

    record! {
        struct Note {
            id: u64,
            title: String,
            body: String,
            pinned: bool = true,
        }
    }

    record! {
        #[record(serde)]
        struct Reminder {
            id: u64,
            text: String,
            due: Option<u32>,
        }
    }

    #[test]
    fn test_serde_partial_tells_null_from_absent() {
        let absent: ReminderPartial = serde_json::from_str(r#"{ "text": "call" }"#).unwrap();
        assert_eq!(absent.due, None);

        let cleared: ReminderPartial = serde_json::from_str(r#"{ "due": null }"#).unwrap();
        assert_eq!(cleared.due, Some(None));
        assert_eq!(cleared.text, None);

        let mut reminder = Reminder {
            id: Some(1),
            text: "call".into(),
            due: Some(9),
        };
        reminder.merge(cleared);
        assert_eq!(reminder.due, None);
        assert_eq!(reminder.text, "call");
    }

    #[test]
    fn test_from_partial_overlays_defaults() {
        let note = Note::from_partial(NotePartial {
            title: Some("groceries".into()),
            ..Default::default()
        });
        assert_eq!(note.id, None);
        assert_eq!(note.title, "groceries");
        assert_eq!(note.body, "");
        assert!(note.pinned);
    }

    #[test]
    fn test_merge_only_overwrites_supplied_fields() {
        let mut note = Note {
            id: Some(7),
            title: "old".into(),
            body: "keep me".into(),
            pinned: false,
        };
        note.merge(NotePartial {
            title: Some("new".into()),
            ..Default::default()
        });
        assert_eq!(note.id, Some(7));
        assert_eq!(note.title, "new");
        assert_eq!(note.body, "keep me");
        assert!(!note.pinned);
    }

    #[test]
    fn test_entity_name_strips_module_path() {
        assert_eq!(entity_name::<Note>(), "Note");
    }

    #[test]
    fn test_entity_name_of_generic_type() {
        assert_eq!(entity_name::<Option<Note>>(), "Option");
        assert_eq!(entity_name::<std::collections::BTreeMap<u64, Note>>(), "BTreeMap");
    }
}
