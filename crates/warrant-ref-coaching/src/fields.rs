//! Field-name vocabularies.
//!
//! Field scopes are plain strings inside the engine; these enums keep the
//! policy table and its callers from misspelling them. Each converts into the
//! wire name and can be passed anywhere a field name is expected.

use std::fmt;
use std::str::FromStr;

use warrant_contracts::WarrantError;

macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal $(| $alias:literal)*),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl From<$name> for String {
            fn from(field: $name) -> String {
                field.as_str().to_string()
            }
        }

        impl FromStr for $name {
            type Err = WarrantError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire $(| $alias)* => Ok($name::$variant),)*
                    other => Err(WarrantError::InvalidRule {
                        reason: format!("unknown {} field '{}'", stringify!($name), other),
                    }),
                }
            }
        }
    };
}

field_enum! {
    /// Fields of a `User`. The legacy names `role` and `coach` parse to
    /// `Roles` and `Coaches`.
    UserField {
        Id => "id",
        Password => "password",
        Email => "email",
        EmailVerified => "email_verified",
        FirstName => "first_name",
        LastName => "last_name",
        Roles => "roles" | "role",
        Status => "status",
        DateCreated => "date_created",
        LastAccess => "last_access",
        Coaches => "coaches" | "coach",
        Municipality => "municipality",
        Institution => "institution",
    }
}

field_enum! {
    /// Fields of a `Behavior`.
    BehaviorField {
        Id => "id",
        Behavior => "behavior",
        Description => "description",
        User => "user",
        Desired => "desired",
        DateCreated => "date_created",
        DateUpdated => "date_updated",
        ObservationMethods => "observation_methods",
        Observers => "observers",
    }
}

field_enum! {
    /// Fields of an `Institution`.
    InstitutionField {
        Id => "id",
        Name => "name",
        DateCreated => "date_created",
        Municipality => "municipality",
    }
}
