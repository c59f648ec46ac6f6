/// The declared visibility of a member.
///
/// `Crate` covers everything between `pub` and private, such as
/// `pub(crate)` and `pub(super)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    Public,
    Protected,
    Crate,
    #[default]
    Private,
}

impl Visibility {
    #[inline]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }

    #[inline]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}
