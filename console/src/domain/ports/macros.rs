//! Helper macro for declaring port error enums.
//!
//! Each declared variant gets a snake_case constructor accepting `impl Into`
//! arguments, and the enum gains a `kind()` accessor returning the variant
//! name for structured log fields.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (@pattern $variant:ident) => { Self::$variant };
    (@pattern $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => { Self::$variant { .. } };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Variant name, suitable for structured log fields.
            pub fn kind(&self) -> &'static str {
                match self {
                    $(
                        define_port_error!(@pattern $variant $( { $($field : $ty),* } )?) => {
                            stringify!($variant)
                        }
                    )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum UploadPortError {
            Rejected => "upload rejected",
            TooLarge { limit: u64 } => "file exceeds {limit} bytes",
            Failed { message: String, attempt: u32 } => "upload failed: {message} (attempt {attempt})",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        let err = UploadPortError::rejected();
        assert_eq!(err.to_string(), "upload rejected");
        assert_eq!(err.kind(), "Rejected");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = UploadPortError::too_large(1024_u64);
        assert_eq!(err.to_string(), "file exceeds 1024 bytes");
        assert_eq!(err.kind(), "TooLarge");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = UploadPortError::failed("receipt.pdf unreadable", 2_u32);
        assert_eq!(
            err.to_string(),
            "upload failed: receipt.pdf unreadable (attempt 2)"
        );
        assert_eq!(err.kind(), "Failed");
    }
}
