use super::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::rc::Rc;

const REP: usize = if cfg!(miri) { 2 } else { 20 };
const N: usize = if cfg!(miri) { 100 } else { 100000 };

fn sample() -> AvlSet<i32> {
    let mut set = AvlSet::new();
    for v in [1, -1, 3, -4, 5, 6, 7, 8] {
        assert!(set.insert(v));
    }
    set
}

#[test]
fn size_test() {
    let mut set = AvlSet::new();
    assert_eq!(set.len(), 0);

    set.insert(4);
    set.insert(5);
    set.insert(6);
    set.insert(3);
    assert_eq!(set.len(), 4);

    set.insert(2);
    set.insert(4);
    set.insert(5);
    assert_eq!(set.len(), 5);
    set.check();
}

#[test]
fn is_empty_test() {
    let mut set = AvlSet::new();
    assert!(set.is_empty());
    set.add_all([1, 2, 3]);
    assert!(!set.is_empty());
}

#[test]
fn contains_test() {
    let mut set = AvlSet::new();
    set.add_all(1..=8);
    assert!(set.contains(&1));
    assert!(set.contains(&3));
    assert!(!set.contains(&9));
    assert!(!set.contains(&12));
}

#[test]
fn ascending_insert_height_test() {
    let mut set = AvlSet::new();
    set.add_all(1..=8);
    assert_eq!(set.len(), 8);
    // ceil(log2(9)) = 4
    assert!(set.height().unwrap() <= 4);
    set.check();
}

#[test]
fn add_test() {
    let set = sample();
    assert!(set.contains(&1));
    assert!(set.contains(&-1));
    assert!(set.contains(&3));
    assert!(!set.contains(&9));
    assert!(!set.contains(&12));
    assert_eq!(set.len(), 8);
    set.check();
}

#[test]
fn duplicate_insert_test() {
    let mut set = sample();
    let before = set.tree_dump();
    assert!(!set.insert(5));
    assert_eq!(set.len(), 8);
    assert_eq!(set.tree_dump(), before);
}

#[test]
fn remove_test() {
    let mut set = sample();
    assert_eq!(set.len(), 8);

    // leaf
    assert!(set.remove(&8));
    assert_eq!(set.len(), 7);
    assert!(!set.contains(&8));
    set.check();

    // one child
    assert!(set.remove(&-1));
    assert_eq!(set.len(), 6);
    assert!(!set.contains(&-1));
    set.check();

    // two children
    assert!(set.remove(&1));
    assert_eq!(set.len(), 5);
    assert!(!set.contains(&1));
    set.check();

    // root
    assert!(set.contains(&5));
    assert!(set.remove(&5));
    assert_eq!(set.len(), 4);
    assert!(!set.contains(&5));
    set.check();

    for v in [-4, 3, 6, 7] {
        assert!(set.contains(&v));
    }
    assert!(!set.remove(&1000));
    assert!(!set.remove(&5));
    assert_eq!(set.len(), 4);
    assert_eq!(set.to_vec(), [-4, 3, 6, 7]);
}

#[test]
fn remove_from_empty_test() {
    let mut set: AvlSet<i32> = AvlSet::new();
    assert!(!set.remove(&1));
    assert_eq!(set.take(&1), None);
    assert_eq!(set.pop_first(), None);
    assert_eq!(set.pop_last(), None);
    assert_eq!(set.validate(), Ok(()));
}

#[test]
fn rotation_shapes_test() {
    // Single right, left-right and right-left all end with 2 at the top.
    for order in [[3, 2, 1], [3, 1, 2], [1, 3, 2], [1, 2, 3]] {
        let mut set = AvlSet::new();
        set.add_all(order);
        assert_eq!(set.tree_dump(), "2\n├─ 1\n└─ 3");
        set.check();
    }
}

#[test]
fn successor_splice_test() {
    let mut set = AvlSet::from([1, 2, 3]);
    // 2 has two children, its successor 3 is spliced out and 3 moves into the root.
    assert_eq!(set.take(&2), Some(2));
    assert_eq!(set.tree_dump(), "3\n├─ 1\n└─ ∅");
    set.check();
}

#[test]
fn remove_root_without_right_subtree_test() {
    let mut set = AvlSet::new();
    set.add_all([2, 1]);
    assert!(set.remove(&2));
    assert_eq!(set.tree_dump(), "1");
    set.check();
}

#[test]
fn remove_rebalance_test() {
    // Right child leaning right: single rotation.
    let mut set = AvlSet::new();
    set.add_all([2, 1, 3, 4]);
    assert!(set.remove(&1));
    assert_eq!(set.tree_dump(), "3\n├─ 2\n└─ 4");
    set.check();

    // Right child leaning left: double rotation.
    let mut set = AvlSet::new();
    set.add_all([2, 1, 4, 3]);
    assert!(set.remove(&1));
    assert_eq!(set.tree_dump(), "3\n├─ 2\n└─ 4");
    set.check();

    // Right child balanced: single rotation.
    let mut set = AvlSet::new();
    set.add_all([2, 1, 4, 3, 5]);
    assert!(set.remove(&1));
    assert_eq!(set.tree_dump(), "4\n├─ 2\n│  ├─ ∅\n│  └─ 3\n└─ 5");
    set.check();
}

#[test]
fn clear_test() {
    let mut set = AvlSet::new();
    for i in -50..100 {
        set.insert(i);
    }
    assert_eq!(set.len(), 150);
    set.clear();
    assert_eq!(set.len(), 0);
    assert_eq!(set.height(), None);
    assert!(set.insert(7));
    set.check();
}

#[test]
fn comparator_test() {
    let mut set = AvlSet::with_comparator(|v1: &i32, v2: &i32| {
        let c = (v1 % 2).cmp(&(v2 % 2));
        c.then(v1.cmp(v2))
    });
    set.add_all(1..=8);
    assert_eq!(set.to_vec(), [2, 4, 6, 8, 1, 3, 5, 7]);
    assert!(!set.insert(4));
    assert_eq!(set.len(), 8);
    assert_eq!(set.first(), Some(&2));
    assert_eq!(set.last(), Some(&7));
    set.check();
}

#[test]
fn comparator_equal_means_same_element_test() {
    let mut set = AvlSet::with_comparator(|a: &(i32, &str), b: &(i32, &str)| a.0.cmp(&b.0));
    assert!(set.insert((1, "a")));
    assert!(!set.insert((1, "b")));
    assert_eq!(set.get(&(1, "z")), Some(&(1, "a")));
    assert_eq!(set.replace((1, "b")), Some((1, "a")));
    assert_eq!(set.get(&(1, "z")), Some(&(1, "b")));
    assert_eq!(set.replace((2, "c")), None);
    assert_eq!(set.len(), 2);
    for i in 3..20 {
        assert_eq!(set.replace((i, "d")), None);
    }
    assert_eq!(set.len(), 19);
    set.check();
}

#[test]
fn contains_all_test() {
    let set = AvlSet::from([1, 2, 3]);
    let mut list: Vec<i32> = Vec::new();
    assert!(set.contains_all(&list));
    list.push(1);
    list.push(2);
    assert!(set.contains_all(&list));
    list.push(4);
    assert!(!set.contains_all(&list));
}

#[test]
fn add_all_test() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut set = AvlSet::new();
    let mut set1 = AvlSet::new();
    let mut list = Vec::new();
    for _ in 0..20 {
        let v = rng.gen_range(0..50);
        set1.insert(v);
        list.push(v);
    }
    set.add_all(list.iter().copied());
    assert_eq!(set.to_vec(), set1.to_vec());

    let mut set = AvlSet::from([1, 2, 3]);
    assert!(!set.add_all([1, 2, 3]));
    assert!(set.add_all([1, 2, 3, 4]));
    assert_eq!(set.len(), 4);
    // Duplicates in the batch count once.
    assert!(set.add_all([5, 5, 5]));
    assert_eq!(set.len(), 5);
}

#[test]
fn remove_all_test() {
    let mut set = AvlSet::from([1, 2, 3]);
    let mut list: Vec<i32> = Vec::new();
    assert!(!set.remove_all(&list));

    list.push(1);
    list.push(2);
    assert!(set.remove_all(&list));
    assert_eq!(set.len(), 1);
    assert!(!set.contains(&1));
    assert!(set.contains(&3));

    list.push(3);
    assert!(set.remove_all(&list));
    assert_eq!(set.len(), 0);
    assert!(!set.contains(&3));
    assert!(!set.remove_all(&list));
}

#[test]
fn retain_all_test() {
    let mut set = AvlSet::from([1, 2, 3]);
    let mut list = vec![1, 2, 3];

    assert!(!set.retain_all(&list));
    assert_eq!(set.len(), 3);
    assert!(set.contains_all([1, 2, 3]));

    list.retain(|&v| v != 3);
    assert!(set.retain_all(&list));
    assert_eq!(set.len(), 2);
    assert!(!set.contains(&3));
    assert!(set.contains(&2));
    assert!(set.contains(&1));
    set.check();

    // Elements of the batch that are not in the set never add anything.
    assert!(!set.retain_all([0, 1, 2, 9]));
    assert_eq!(set.to_vec(), [1, 2]);
    assert!(set.retain_all(Vec::<i32>::new()));
    assert!(set.is_empty());
}

#[test]
fn retain_all_uses_set_order_test() {
    let mut set = AvlSet::with_comparator(|a: &String, b: &String| {
        a.to_lowercase().cmp(&b.to_lowercase())
    });
    set.add_all(["Apple", "banana", "Cherry"].map(String::from));
    assert!(set.retain_all(["APPLE".to_string(), "cherry".to_string()]));
    assert_eq!(set.to_vec(), ["Apple", "Cherry"]);
}

#[test]
fn retain_test() {
    let mut set: AvlSet<i32> = (0..100).collect();
    assert!(set.retain(|v| v % 3 == 0));
    assert_eq!(set.len(), 34);
    assert!(set.iter().all(|v| v % 3 == 0));
    assert!(!set.retain(|_| true));
    set.check();
}

#[test]
fn pop_test() {
    let mut set: AvlSet<i32> = (0..64).collect();
    for i in 0..32 {
        assert_eq!(set.pop_first(), Some(i));
        assert_eq!(set.pop_last(), Some(63 - i));
        set.check();
    }
    assert!(set.is_empty());
}

#[test]
fn iter_test() {
    let set: AvlSet<usize> = (0..100).rev().collect();
    assert_eq!(set.iter().len(), 100);
    assert!(set.iter().copied().eq(0..100));
    assert!(set.iter().rev().copied().eq((0..100).rev()));

    // Alternate ends, every element exactly once.
    let mut iter = set.iter();
    let mut seen = Vec::new();
    let mut front = true;
    while let Some(&v) = if front { iter.next() } else { iter.next_back() } {
        seen.push(v);
        front = !front;
        assert_eq!(iter.len(), 100 - seen.len());
    }
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);
    seen.sort_unstable();
    assert!(seen.into_iter().eq(0..100));

    // Restartable.
    assert_eq!(set.iter().next(), Some(&0));
    assert_eq!(set.iter().last(), Some(&99));
}

#[test]
fn into_iter_test() {
    let set = AvlSet::from([5, 3, 9, 1]);
    assert_eq!(set.clone().into_iter().collect::<Vec<_>>(), [1, 3, 5, 9]);
    assert_eq!(set.into_iter().rev().collect::<Vec<_>>(), [9, 5, 3, 1]);

    let strings: AvlSet<String> = ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
    let mut it = strings.into_iter();
    assert_eq!(it.len(), 3);
    assert_eq!(it.next().as_deref(), Some("a"));
}

#[test]
fn traits_test() {
    let a = AvlSet::from([3, 1, 2]);
    let mut b: AvlSet<i32> = AvlSet::new();
    b.extend(&[2, 3]);
    b.extend([1]);
    assert_eq!(a, b);
    assert_eq!(format!("{a:?}"), "{1, 2, 3}");

    let hash = |s: &AvlSet<i32>| {
        let mut h = DefaultHasher::new();
        s.hash(&mut h);
        h.finish()
    };
    assert_eq!(hash(&a), hash(&b));

    let c = AvlSet::from([1, 2, 4]);
    assert!(a < c);
    assert_ne!(a, c);

    let mut d = a.clone();
    d.insert(10);
    assert_eq!(a.len(), 3);
    assert_eq!(d.len(), 4);
    d.check();

    let e: AvlSet<i32> = AvlSet::default();
    assert!(e.is_empty());
}

#[test]
fn validate_detects_inconsistent_order_test() {
    let flip = Rc::new(Cell::new(false));
    let f = flip.clone();
    let mut set = AvlSet::with_comparator(move |a: &i32, b: &i32| {
        if f.get() {
            b.cmp(a)
        } else {
            a.cmp(b)
        }
    });
    set.add_all(1..=5);
    assert_eq!(set.validate(), Ok(()));
    flip.set(true);
    assert_eq!(
        set.validate(),
        Err(InvariantError::OutOfOrder { position: 1 })
    );
}

#[test]
fn validate_detects_corruption_test() {
    let fresh = || {
        let set = AvlSet::from([1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(set.tree_dump(), "4\n├─ 2\n│  ├─ 1\n│  └─ 3\n└─ 6\n   ├─ 5\n   └─ 7");
        set
    };

    let mut set = fresh();
    let root = set.tree.root.unwrap();
    set.tree.arena[root].height = 9;
    assert_eq!(
        set.validate(),
        Err(InvariantError::StaleHeight {
            depth: 0,
            cached: 9,
            computed: 2
        })
    );

    let mut set = fresh();
    let root = set.tree.root.unwrap();
    set.tree.arena[root].balance = 1;
    assert_eq!(
        set.validate(),
        Err(InvariantError::StaleBalance {
            depth: 0,
            cached: 1,
            computed: 0
        })
    );

    let mut set = fresh();
    let root = set.tree.root.unwrap();
    let left = set.tree.arena[root].left.unwrap();
    set.tree.arena[left].parent = None;
    assert_eq!(set.validate(), Err(InvariantError::BrokenParent { depth: 1 }));

    let mut set = fresh();
    set.len = 6;
    assert_eq!(
        set.validate(),
        Err(InvariantError::LenMismatch { len: 6, count: 7 })
    );
    set.len = 8;
    assert_eq!(
        set.validate(),
        Err(InvariantError::LenMismatch { len: 8, count: 7 })
    );

    // Detach the left subtree of the root, keeping the cached fields consistent.
    let mut set = fresh();
    let root = set.tree.root.unwrap();
    set.tree.arena[root].left = None;
    set.tree.arena[root].balance = 2;
    assert_eq!(
        set.validate(),
        Err(InvariantError::Unbalanced {
            depth: 0,
            balance: 2
        })
    );

    let set = fresh();
    assert_eq!(set.validate(), Ok(()));
}

#[test]
fn invariant_error_display_test() {
    let e = InvariantError::LenMismatch { len: 3, count: 2 };
    assert_eq!(e.to_string(), "length is 3 but 2 nodes are reachable");
    let e = InvariantError::Unbalanced {
        depth: 1,
        balance: -2,
    };
    assert_eq!(e.to_string(), "node at depth 1 has balance factor -2");
}

#[test]
fn model_test() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut set = AvlSet::new();
    let mut model = std::collections::BTreeSet::new();
    for step in 0..20000 {
        let v: i32 = rng.gen_range(-200..200);
        match rng.gen_range(0..6) {
            0 | 1 => assert_eq!(set.insert(v), model.insert(v)),
            2 => assert_eq!(set.remove(&v), model.remove(&v)),
            3 => assert_eq!(set.take(&v), model.take(&v)),
            4 => assert_eq!(set.contains(&v), model.contains(&v)),
            _ => assert_eq!(set.pop_first(), model.pop_first()),
        }
        assert_eq!(set.len(), model.len());
        if step % 64 == 0 {
            set.check();
            assert!(set.iter().eq(model.iter()));
        }
    }
    set.check();
    assert!(set.iter().eq(model.iter()));
}

#[test]
fn height_bound_test() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut set = AvlSet::new();
    for i in 0..N {
        set.insert(i);
    }
    for _ in 0..N / 2 {
        set.remove(&rng.gen_range(0..N));
    }
    let n = set.len() as f64;
    let bound = 1.4405 * (n + 2.0).log2() - 0.3277;
    assert!((set.height().unwrap() as f64) < bound);
    set.check();
}

#[test]
fn exp_mem_test() {
    let n = N * 10;
    let mut set = AvlSet::new();
    for i in 0..n {
        set.insert(i as u32);
    }
    println!("Done insertions");
    print_memory();
    println!("Required memory: {} bytes", n * 4);
    set.clear();
    assert!(set.is_empty());
}

#[test]
fn freed_slots_reused_test() {
    let mut set = AvlSet::new();
    for _rep in 0..REP {
        for i in 0..1000 {
            set.insert(i);
        }
        for i in 0..1000 {
            assert!(set.remove(&i));
        }
        assert!(set.is_empty());
    }
    set.check();
}

#[test]
#[cfg(feature = "serde")]
fn exp_serde_test() {
    let set: AvlSet<u32> = (0..1000u32).rev().collect();
    for _i in 0..REP {
        let ser = bincode::serialize(&set).unwrap();
        let de: AvlSet<u32> = bincode::deserialize(&ser).unwrap();
        assert_eq!(de, set);
        de.check();
    }
}

/// Straightforward AVL tree that recomputes every height by full descent,
/// used to confirm the cached-height engine makes identical rotation choices.
mod recompute {
    use std::cmp::{max, Ordering};

    struct Node {
        value: i32,
        left: Option<usize>,
        right: Option<usize>,
        parent: Option<usize>,
    }

    #[derive(Default)]
    pub struct RecomputeTree {
        nodes: Vec<Node>,
        root: Option<usize>,
    }

    impl RecomputeTree {
        fn push(&mut self, value: i32, parent: Option<usize>) -> usize {
            self.nodes.push(Node {
                value,
                left: None,
                right: None,
                parent,
            });
            self.nodes.len() - 1
        }

        fn height(&self, n: Option<usize>) -> i32 {
            match n {
                None => -1,
                Some(i) => 1 + max(self.height(self.nodes[i].left), self.height(self.nodes[i].right)),
            }
        }

        pub fn insert(&mut self, value: i32) -> bool {
            let Some(mut n) = self.root else {
                self.root = Some(self.push(value, None));
                return true;
            };
            loop {
                let go_left = match value.cmp(&self.nodes[n].value) {
                    Ordering::Equal => return false,
                    Ordering::Less => true,
                    Ordering::Greater => false,
                };
                let next = if go_left {
                    self.nodes[n].left
                } else {
                    self.nodes[n].right
                };
                match next {
                    Some(c) => n = c,
                    None => {
                        let leaf = self.push(value, Some(n));
                        if go_left {
                            self.nodes[n].left = Some(leaf);
                        } else {
                            self.nodes[n].right = Some(leaf);
                        }
                        self.rebalance(n);
                        return true;
                    }
                }
            }
        }

        pub fn remove(&mut self, value: i32) -> bool {
            let Some(mut n) = self.root else {
                return false;
            };
            let mut candidate = None;
            loop {
                let cmp = value.cmp(&self.nodes[n].value);
                if cmp == Ordering::Equal {
                    candidate = Some(n);
                }
                let child = if cmp == Ordering::Less {
                    self.nodes[n].left
                } else {
                    self.nodes[n].right
                };
                match child {
                    Some(c) => n = c,
                    None => break,
                }
            }
            let Some(candidate) = candidate else {
                return false;
            };
            self.nodes[candidate].value = self.nodes[n].value;
            let child = self.nodes[n].left.or(self.nodes[n].right);
            let parent = self.nodes[n].parent;
            if let Some(c) = child {
                self.nodes[c].parent = parent;
            }
            match parent {
                Some(p) => {
                    if self.nodes[p].left == Some(n) {
                        self.nodes[p].left = child;
                    } else {
                        self.nodes[p].right = child;
                    }
                    self.rebalance(p);
                }
                None => self.root = child,
            }
            true
        }

        fn rebalance(&mut self, mut n: usize) {
            let balance = self.height(self.nodes[n].right) - self.height(self.nodes[n].left);
            if balance == -2 {
                let l = self.nodes[n].left.unwrap();
                if self.height(self.nodes[l].left) >= self.height(self.nodes[l].right) {
                    n = self.rotate_right(n);
                } else {
                    self.rotate_left(l);
                    n = self.rotate_right(n);
                }
            } else if balance == 2 {
                let r = self.nodes[n].right.unwrap();
                if self.height(self.nodes[r].right) >= self.height(self.nodes[r].left) {
                    n = self.rotate_left(n);
                } else {
                    self.rotate_right(r);
                    n = self.rotate_left(n);
                }
            }
            match self.nodes[n].parent {
                Some(p) => self.rebalance(p),
                None => self.root = Some(n),
            }
        }

        fn relink_parent(&mut self, parent: Option<usize>, old: usize, new: usize) {
            if let Some(p) = parent {
                if self.nodes[p].right == Some(old) {
                    self.nodes[p].right = Some(new);
                } else {
                    self.nodes[p].left = Some(new);
                }
            }
        }

        fn rotate_left(&mut self, a: usize) -> usize {
            let b = self.nodes[a].right.unwrap();
            let parent = self.nodes[a].parent;
            self.nodes[b].parent = parent;
            self.nodes[a].right = self.nodes[b].left;
            if let Some(r) = self.nodes[a].right {
                self.nodes[r].parent = Some(a);
            }
            self.nodes[b].left = Some(a);
            self.nodes[a].parent = Some(b);
            self.relink_parent(parent, a, b);
            b
        }

        fn rotate_right(&mut self, a: usize) -> usize {
            let b = self.nodes[a].left.unwrap();
            let parent = self.nodes[a].parent;
            self.nodes[b].parent = parent;
            self.nodes[a].left = self.nodes[b].right;
            if let Some(l) = self.nodes[a].left {
                self.nodes[l].parent = Some(a);
            }
            self.nodes[b].right = Some(a);
            self.nodes[a].parent = Some(b);
            self.relink_parent(parent, a, b);
            b
        }

        pub fn dump(&self) -> String {
            let mut out = String::new();
            if let Some(root) = self.root {
                self.dump_node(root, "", &mut out);
            }
            out
        }

        fn dump_node(&self, n: usize, tab: &str, out: &mut String) {
            let node = &self.nodes[n];
            out.push_str(&node.value.to_string());
            if node.left.is_none() && node.right.is_none() {
                return;
            }
            for (child, last) in [(node.left, false), (node.right, true)] {
                out.push('\n');
                out.push_str(tab);
                out.push_str(if last { "└─ " } else { "├─ " });
                match child {
                    Some(c) => {
                        let tab = format!("{tab}{}", if last { "   " } else { "│  " });
                        self.dump_node(c, &tab, out);
                    }
                    None => out.push('∅'),
                }
            }
        }
    }
}

#[test]
fn matches_recompute_tree_test() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _rep in 0..REP {
        let mut set = AvlSet::new();
        let mut reference = recompute::RecomputeTree::default();
        for _ in 0..600 {
            let v: i32 = rng.gen_range(0..150);
            if rng.gen_bool(0.55) {
                assert_eq!(set.insert(v), reference.insert(v));
            } else {
                assert_eq!(set.remove(&v), reference.remove(v));
            }
            assert_eq!(set.tree_dump(), reference.dump());
        }
        set.check();
    }
}
