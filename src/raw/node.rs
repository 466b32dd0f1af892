use super::handle::Handle;

/// Which child of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// An AVL tree node: the key, a handle into the value arena, and the three links.
///
/// Absent links are [`Handle::NIL`]. The root's parent is `NIL` too.
pub(crate) struct Node<K> {
    key: K,
    value: Handle,
    left: Handle,
    right: Handle,
    parent: Handle,
    // Height of the subtree rooted here; a leaf is 1 and `NIL` counts as 0.
    // An AVL tree of height 255 would need more nodes than a `Handle` can address.
    height: u8,
}

impl<K> Node<K> {
    /// A new leaf below `parent`.
    pub(crate) const fn new(key: K, value: Handle, parent: Handle) -> Self {
        Self {
            key,
            value,
            left: Handle::NIL,
            right: Handle::NIL,
            parent,
            height: 1,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> Handle {
        self.value
    }

    #[inline]
    pub(crate) const fn left(&self) -> Handle {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Handle {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Handle {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Handle) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Which side `child` hangs on. `child` must be one of the two children.
    #[inline]
    pub(crate) fn side_of(&self, child: Handle) -> Side {
        if self.left == child {
            Side::Left
        } else {
            debug_assert_eq!(self.right, child, "`Node::side_of()` - not a child!");
            Side::Right
        }
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Handle {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Handle) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: u8) {
        self.height = height;
    }

    pub(crate) fn into_key(self) -> K {
        self.key
    }
}
