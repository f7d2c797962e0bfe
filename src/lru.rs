/// Arena slot reserved for the sentinel node. The sentinel keeps the list
/// structurally non-empty so splicing needs no head or tail null checks.
const SENTINEL: usize = 0;

#[derive(Debug)]
struct Node {
    data: usize,
    next: usize,
    prev: usize,
}

/// The `LruQueue` struct maintains a recency ordering over a set of small
/// integer identities (frame numbers, TLB slot indices). It is a doubly
/// linked list threaded through an arena of nodes, where `next` and `prev`
/// are arena indices rather than pointers. The list is circular through the
/// sentinel: `sentinel.next` is the most recently used element and
/// `sentinel.prev` is the least recently used one, which makes the tail the
/// eviction victim.
///
/// Uniqueness of the queued values is a caller invariant and is not enforced
/// here.
pub struct LruQueue {
    nodes: Vec<Node>,
    spare: Vec<usize>,
}

impl LruQueue {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: 0,
                next: SENTINEL,
                prev: SENTINEL,
            }],
            spare: Vec::new(),
        }
    }

    fn link_front(&mut self, node: usize) {
        let head = self.nodes[SENTINEL].next;
        self.nodes[node].prev = SENTINEL;
        self.nodes[node].next = head;
        self.nodes[head].prev = node;
        self.nodes[SENTINEL].next = node;
    }

    fn unlink(&mut self, node: usize) {
        let (next, prev) = (self.nodes[node].next, self.nodes[node].prev);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Append `data` at the most-recently-used end. The value must not
    /// already be queued. Arena slots freed by `pop_tail` are reused before
    /// the arena grows.
    pub fn insert_new(&mut self, data: usize) {
        let node = match self.spare.pop() {
            Some(index) => {
                self.nodes[index].data = data;
                index
            }
            None => {
                self.nodes.push(Node {
                    data,
                    next: SENTINEL,
                    prev: SENTINEL,
                });
                self.nodes.len() - 1
            }
        };
        self.link_front(node);
    }

    /// Splice an already-queued value to the most-recently-used end. The
    /// scan runs from the head side; queue lengths here are at most the
    /// frame count, so an index map would cost more than it saves.
    pub fn promote(&mut self, data: usize) {
        let head = self.nodes[SENTINEL].next;
        if head != SENTINEL && self.nodes[head].data == data {
            return;
        }

        let mut node = head;
        while node != SENTINEL && self.nodes[node].data != data {
            node = self.nodes[node].next;
        }
        debug_assert!(node != SENTINEL, "promoted value is not queued");
        if node == SENTINEL {
            return;
        }

        self.unlink(node);
        self.link_front(node);
    }

    /// The least-recently-used value, left in place.
    pub fn peek_tail(&self) -> Option<usize> {
        match self.nodes[SENTINEL].prev {
            SENTINEL => None,
            node => Some(self.nodes[node].data),
        }
    }

    /// Remove and return the least-recently-used value.
    pub fn pop_tail(&mut self) -> Option<usize> {
        match self.nodes[SENTINEL].prev {
            SENTINEL => None,
            node => {
                self.unlink(node);
                self.spare.push(node);
                Some(self.nodes[node].data)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[SENTINEL].next == SENTINEL
    }

    pub fn len(&self) -> usize {
        self.nodes.len() - 1 - self.spare.len()
    }

    /// Iterate the queued values from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            queue: self,
            node: self.nodes[SENTINEL].next,
        }
    }
}

pub struct Iter<'a> {
    queue: &'a LruQueue,
    node: usize,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.node == SENTINEL {
            return None;
        }
        let data = self.queue.nodes[self.node].data;
        self.node = self.queue.nodes[self.node].next;
        Some(data)
    }
}
