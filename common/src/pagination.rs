//! Abstractions for cursor-based pagination.

use std::fmt;

/// Page of nodes selected out of a larger list.
#[derive(Clone, Debug)]
pub struct Connection<C, I> {
    /// [`Edge`]s forming this [`Connection`].
    pub edges: Vec<Edge<C, I>>,

    /// [`Kind`] of pagination this [`Connection`] was selected with.
    pub kind: Kind,

    /// Indicator whether the list continues past this [`Connection`].
    pub has_more: bool,
}

/// A page in a [`Connection`].
pub type Page<C, I> = Connection<C, I>;

impl<C, I> Connection<C, I> {
    /// Assembles a new [`Connection`] out of the provided [`Edge`]s.
    #[must_use]
    pub fn new(
        args: &Arguments<C>,
        edges: impl IntoIterator<Item = impl Into<Edge<C, I>>>,
        has_more: bool,
    ) -> Self {
        Self {
            edges: edges.into_iter().map(Into::into).collect::<Vec<_>>(),
            kind: args.kind(),
            has_more,
        }
    }

    /// Returns [`PageInfo`] describing this [`Connection`].
    #[must_use]
    pub fn page_info(&self) -> PageInfo<C>
    where
        C: Clone,
    {
        PageInfo {
            end_cursor: self.edges.last().map(|e| e.cursor.clone()),
            has_next_page: self.has_more && self.kind.is_forward(),
            has_previous_page: self.has_more && self.kind.is_backward(),
        }
    }
}

/// Information about a page in a [`Connection`].
#[derive(Clone, Copy, Debug)]
pub struct PageInfo<C> {
    /// Last cursor on this page.
    pub end_cursor: Option<C>,

    /// Indicator whether the [`Connection`] has a next page.
    pub has_next_page: bool,

    /// Indicator whether the [`Connection`] has a previous page.
    pub has_previous_page: bool,
}

/// Single node of a [`Connection`] along with its cursor.
#[derive(Clone, Copy, Debug)]
pub struct Edge<C, I> {
    /// Cursor of this [`Edge`].
    pub cursor: C,

    /// Node of this [`Edge`].
    pub node: I,
}

impl<C, I> From<(C, I)> for Edge<C, I> {
    fn from((cursor, node): (C, I)) -> Self {
        Self { cursor, node }
    }
}

/// Pagination arguments.
#[derive(Clone, Copy, Debug)]
pub enum Arguments<C> {
    /// Forward pagination.
    Forward {
        /// Number of items to return.
        first: usize,

        /// Cursor after which to return items.
        after: Option<C>,

        /// Indicator whether the `after` cursor itself belongs to the result.
        including: bool,
    },

    /// Backward pagination.
    Backward {
        /// Number of items to return.
        last: usize,

        /// Cursor before which to return items.
        before: Option<C>,

        /// Indicator whether the `before` cursor itself belongs to the
        /// result.
        including: bool,
    },
}

impl<C> Arguments<C> {
    /// Creates a new [`Arguments`] out of raw [GraphQL Cursor Connections]
    /// arguments.
    ///
    /// [`None`] is returned for combinations that have no single meaning,
    /// except the ones where `after` and `before` point at the same cursor,
    /// which select exactly that cursor.
    ///
    /// [GraphQL Cursor Connections]: https://relay.dev/graphql/connections.htm
    pub fn new<Num>(
        first: Option<Num>,
        after: Option<C>,
        last: Option<Num>,
        before: Option<C>,
        default: Num,
    ) -> Option<Self>
    where
        C: PartialEq + fmt::Debug,
        Num: TryInto<usize> + fmt::Debug,
    {
        Some(match (first, after, last, before) {
            (None, None, None, None) => Self::Forward {
                first: default.try_into().ok()?,
                after: None,
                including: false,
            },
            (Some(first), None, None, None) => Self::Forward {
                first: first.try_into().ok()?,
                after: None,
                including: false,
            },
            (Some(first), Some(after), None, None) => Self::Forward {
                first: first.try_into().ok()?,
                after: Some(after),
                including: false,
            },
            (Some(first), Some(after), None, Some(before))
                if after == before =>
            {
                Self::Forward {
                    first: first.try_into().ok()?,
                    after: Some(after),
                    including: true,
                }
            }
            (None, None, Some(last), None) => Self::Backward {
                last: last.try_into().ok()?,
                before: None,
                including: false,
            },
            (None, None, Some(last), Some(before)) => Self::Backward {
                last: last.try_into().ok()?,
                before: Some(before),
                including: false,
            },
            (None, Some(after), Some(last), Some(before))
                if after == before =>
            {
                Self::Backward {
                    last: last.try_into().ok()?,
                    before: Some(before),
                    including: true,
                }
            }
            (None, Some(after), None, Some(before)) if after == before => {
                Self::Forward {
                    first: 1,
                    after: Some(after),
                    including: true,
                }
            }
            _ => return None,
        })
    }

    /// Returns the single exact cursor requested by this [`Arguments`], if
    /// any.
    pub fn exact_cursor(&self) -> Option<&C> {
        match self {
            Self::Forward {
                first: 1,
                after,
                including: true,
            } => after.as_ref(),
            Self::Backward {
                last: 1,
                before,
                including: true,
            } => before.as_ref(),
            Self::Forward { .. } | Self::Backward { .. } => None,
        }
    }

    /// Returns the cursor this [`Arguments`] paginates from.
    #[must_use]
    pub fn cursor(&self) -> Option<&C> {
        match self {
            Self::Forward { after, .. } => after.as_ref(),
            Self::Backward { before, .. } => before.as_ref(),
        }
    }

    /// Returns the [`Kind`] of pagination this [`Arguments`] requests.
    pub fn kind(&self) -> Kind {
        match *self {
            Self::Forward { including, .. } => {
                if including {
                    Kind::ForwardIncluding
                } else {
                    Kind::Forward
                }
            }
            Self::Backward { including, .. } => {
                if including {
                    Kind::BackwardIncluding
                } else {
                    Kind::Backward
                }
            }
        }
    }

    /// Returns the limit requested by this [`Arguments`].
    #[must_use]
    pub fn limit(&self) -> usize {
        match *self {
            Self::Forward { first, .. } => first,
            Self::Backward { last, .. } => last,
        }
    }
}

/// Pagination selector.
#[derive(Clone, Copy, Debug)]
pub struct Selector<C, F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments<C>,

    /// Additional filter restricting the result.
    pub filter: F,
}

/// Kind of pagination.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Forward pagination.
    Forward,

    /// Forward pagination including the cursor.
    ForwardIncluding,

    /// Backward pagination.
    Backward,

    /// Backward pagination including the cursor.
    BackwardIncluding,
}

impl Kind {
    /// Indicates whether this [`Kind`] paginates forward.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Forward | Self::ForwardIncluding)
    }

    /// Indicates whether this [`Kind`] paginates backward.
    #[must_use]
    pub fn is_backward(&self) -> bool {
        matches!(self, Self::Backward | Self::BackwardIncluding)
    }

    /// Returns the comparison operator selecting cursors of this [`Kind`].
    #[must_use]
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::Forward => ">",
            Self::ForwardIncluding => ">=",
            Self::Backward => "<",
            Self::BackwardIncluding => "<=",
        }
    }

    /// Returns the [`Order`] cursors of this [`Kind`] are selected in.
    #[must_use]
    pub const fn order(&self) -> Order {
        match self {
            Self::Forward | Self::ForwardIncluding => Order::Ascending,
            Self::Backward | Self::BackwardIncluding => Order::Descending,
        }
    }
}

/// Order of pagination.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    Descending,
}

impl Order {
    #[cfg(feature = "postgres")]
    /// Returns the SQL keyword representing this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($cursor:ty, $node:ty, $filter:ty) => {
        #[doc = "Edge of a [`Connection`]."]
        pub type Edge = $crate::pagination::Edge<$cursor, $node>;

        #[doc = "A [`Connection`] of [`$node`]s."]
        pub type Connection = $crate::pagination::Connection<$cursor, $node>;

        #[doc = "A [`Page`] of [`$node`]s."]
        pub type Page = $crate::pagination::Page<$cursor, $node>;

        #[doc = "An information about a [`Page`]."]
        pub type PageInfo = $crate::pagination::PageInfo<$cursor>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments<$cursor>;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$cursor, $filter>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Connection, Kind, Order};

    fn args(
        first: Option<i32>,
        after: Option<u8>,
        last: Option<i32>,
        before: Option<u8>,
    ) -> Option<Arguments<u8>> {
        Arguments::new(first, after, last, before, 10)
    }

    #[test]
    fn defaults_to_forward_pagination() {
        let Some(Arguments::Forward {
            first,
            after,
            including,
        }) = args(None, None, None, None)
        else {
            panic!("expected `Arguments::Forward`");
        };

        assert_eq!(first, 10);
        assert_eq!(after, None);
        assert!(!including);
    }

    #[test]
    fn paginates_forward_after_a_cursor() {
        let Some(Arguments::Forward {
            first,
            after,
            including,
        }) = args(Some(3), Some(7), None, None)
        else {
            panic!("expected `Arguments::Forward`");
        };

        assert_eq!(first, 3);
        assert_eq!(after, Some(7));
        assert!(!including);
    }

    #[test]
    fn paginates_backward_before_a_cursor() {
        let Some(Arguments::Backward {
            last,
            before,
            including,
        }) = args(None, None, Some(5), Some(2))
        else {
            panic!("expected `Arguments::Backward`");
        };

        assert_eq!(last, 5);
        assert_eq!(before, Some(2));
        assert!(!including);
    }

    #[test]
    fn equal_cursors_select_exactly_that_cursor() {
        let selected = args(None, Some(4), None, Some(4)).unwrap();

        assert_eq!(selected.exact_cursor(), Some(&4));
        assert_eq!(selected.limit(), 1);
        assert_eq!(selected.kind(), Kind::ForwardIncluding);
    }

    #[test]
    fn rejects_ambiguous_combinations() {
        assert!(args(Some(3), None, Some(5), None).is_none());
        assert!(args(None, Some(1), None, None).is_none());
        assert!(args(None, Some(1), None, Some(2)).is_none());
        assert!(args(Some(3), Some(1), Some(5), Some(1)).is_none());
    }

    #[test]
    fn rejects_negative_limits() {
        assert!(args(Some(-1), None, None, None).is_none());
        assert!(args(None, None, Some(-5), None).is_none());
    }

    #[test]
    fn kind_maps_to_operator_and_order() {
        assert_eq!(Kind::Forward.operator(), ">");
        assert_eq!(Kind::ForwardIncluding.operator(), ">=");
        assert_eq!(Kind::Backward.operator(), "<");
        assert_eq!(Kind::BackwardIncluding.operator(), "<=");

        assert_eq!(Kind::Forward.order(), Order::Ascending);
        assert_eq!(Kind::BackwardIncluding.order(), Order::Descending);
    }

    #[test]
    fn page_info_reflects_pagination_direction() {
        let forward = args(Some(2), None, None, None).unwrap();
        let page =
            Connection::<u8, u8>::new(&forward, [(1, 1), (2, 2)], true);
        let info = page.page_info();
        assert_eq!(info.end_cursor, Some(2));
        assert!(info.has_next_page);
        assert!(!info.has_previous_page);

        let backward = args(None, None, Some(2), None).unwrap();
        let page =
            Connection::<u8, u8>::new(&backward, [(2, 2), (1, 1)], true);
        let info = page.page_info();
        assert_eq!(info.end_cursor, Some(1));
        assert!(!info.has_next_page);
        assert!(info.has_previous_page);
    }
}
