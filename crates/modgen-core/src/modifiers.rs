//! Declaration modifier flags.

use bitflags::bitflags;

use crate::Accessibility;

bitflags! {
    /// Modifiers written on a type, member or parameter declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const INTERNAL = 1 << 3;
        const FILE = 1 << 4;
        const ABSTRACT = 1 << 5;
        const SEALED = 1 << 6;
        const STATIC = 1 << 7;
        const PARTIAL = 1 << 8;
        const VIRTUAL = 1 << 9;
        const OVERRIDE = 1 << 10;
        const READONLY = 1 << 11;
        const CONST = 1 << 12;
        const NEW = 1 << 13;
        const EXTERN = 1 << 14;
        const UNSAFE = 1 << 15;
        const VOLATILE = 1 << 16;
        const ASYNC = 1 << 17;
        const REQUIRED = 1 << 18;
        const REF = 1 << 19;
        const OUT = 1 << 20;
        const IN = 1 << 21;
        const PARAMS = 1 << 22;
        const THIS = 1 << 23;
        const SCOPED = 1 << 24;
    }
}

impl Modifiers {
    /// Map a modifier keyword to its flag.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let flag = match text {
            "public" => Self::PUBLIC,
            "private" => Self::PRIVATE,
            "protected" => Self::PROTECTED,
            "internal" => Self::INTERNAL,
            "file" => Self::FILE,
            "abstract" => Self::ABSTRACT,
            "sealed" => Self::SEALED,
            "static" => Self::STATIC,
            "partial" => Self::PARTIAL,
            "virtual" => Self::VIRTUAL,
            "override" => Self::OVERRIDE,
            "readonly" => Self::READONLY,
            "const" => Self::CONST,
            "new" => Self::NEW,
            "extern" => Self::EXTERN,
            "unsafe" => Self::UNSAFE,
            "volatile" => Self::VOLATILE,
            "async" => Self::ASYNC,
            "required" => Self::REQUIRED,
            "ref" => Self::REF,
            "out" => Self::OUT,
            "in" => Self::IN,
            "params" => Self::PARAMS,
            "this" => Self::THIS,
            "scoped" => Self::SCOPED,
            _ => return None,
        };
        Some(flag)
    }

    /// Accessibility spelled by these modifiers, if any accessibility keyword is present.
    pub fn accessibility(self) -> Option<Accessibility> {
        let access = self & (Self::PUBLIC | Self::PRIVATE | Self::PROTECTED | Self::INTERNAL);
        let accessibility = if access == Self::PUBLIC {
            Accessibility::Public
        } else if access == Self::PROTECTED | Self::INTERNAL {
            Accessibility::ProtectedOrInternal
        } else if access == Self::PRIVATE | Self::PROTECTED {
            Accessibility::ProtectedAndInternal
        } else if access == Self::PROTECTED {
            Accessibility::Protected
        } else if access == Self::INTERNAL {
            Accessibility::Internal
        } else if access == Self::PRIVATE {
            Accessibility::Private
        } else if self.contains(Self::FILE) {
            Accessibility::Internal
        } else {
            return None;
        };
        Some(accessibility)
    }
}
