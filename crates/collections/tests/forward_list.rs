//! ForwardList behaviour on a block pool
//!
//! Every test gets a fresh pool from the fixture and checks at the end that
//! the list handed all of its nodes back.

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use tessera_collections::prelude::*;
use tessera_memory::pool::{BlockPool, BlockPoolConfig};

#[fixture]
fn pool() -> BlockPool<'static> {
    BlockPool::with_config(BlockPoolConfig::debug().with_name("forward-list-tests"))
}

fn collect<T: Clone>(list: &ForwardList<'_, T>) -> Vec<T> {
    list.iter().cloned().collect()
}

// ---------------------------------------------------------------------------
// Basic operations
// ---------------------------------------------------------------------------

#[rstest]
fn test_new_list_is_empty(pool: BlockPool<'static>) {
    let list: ForwardList<'_, i32> = ForwardList::new_in(&pool);
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
    assert_eq!(pool.block_count(), 0);
}

#[rstest]
fn test_push_front_and_front(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);

    list.push_front(10).expect("push");
    assert!(!list.is_empty());
    assert_eq!(list.len(), 1);
    assert_eq!(list.front(), Ok(&10));

    list.push_front(20).expect("push");
    assert_eq!(list.len(), 2);
    assert_eq!(list.front(), Ok(&20));
}

#[rstest]
fn test_pop_front(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    list.push_front(10).expect("push");
    list.push_front(20).expect("push");

    assert_eq!(list.pop_front(), Ok(20));
    assert_eq!(list.len(), 1);
    assert_eq!(list.front(), Ok(&10));

    assert_eq!(list.pop_front(), Ok(10));
    assert!(list.is_empty());
    assert_eq!(pool.active_blocks(), 0);
}

#[rstest]
fn test_pop_front_on_empty_list(pool: BlockPool<'static>) {
    let mut list: ForwardList<'_, i32> = ForwardList::new_in(&pool);

    let err = list.pop_front().expect_err("empty list");
    assert!(matches!(err, ListError::EmptyContainer { operation: "pop_front" }));
    assert_eq!(list.front(), Err(ListError::empty_container("front")));

    // Still usable afterwards
    list.push_front(1).expect("push");
    assert_eq!(list.pop_front(), Ok(1));
}

// ---------------------------------------------------------------------------
// Iteration
// ---------------------------------------------------------------------------

#[rstest]
fn test_iteration_steps_through_elements(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    for value in [3, 2, 1] {
        list.push_front(value).expect("push");
    }

    let mut iter = list.iter();
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.next(), Some(&2));
    assert_eq!(iter.next(), Some(&3));
    assert_eq!(iter.next(), None);
}

#[rstest]
fn test_shared_iteration_through_reference(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    list.push_front(42).expect("push");

    let shared = &list;
    let first = shared.iter().next();
    assert_eq!(first, Some(&42));
    assert_eq!(first, shared.into_iter().next());
}

#[rstest]
fn test_for_loop_yields_descending_push_order(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    for value in 1..=3 {
        list.push_front(value).expect("push");
    }

    let mut result = Vec::new();
    for item in &list {
        result.push(*item);
    }
    assert_eq!(result, [3, 2, 1]);
}

// ---------------------------------------------------------------------------
// Insert and erase
// ---------------------------------------------------------------------------

#[rstest]
fn test_insert_after_first_element(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    list.push_front(1).expect("push");
    list.push_front(3).expect("push");

    let inserted = *list.cursor_front_mut().insert_after(2).expect("insert");
    assert_eq!(inserted, 2);
    assert_eq!(collect(&list), [3, 2, 1]);
    assert_eq!(list.len(), 3);
}

#[rstest]
fn test_insert_after_before_begin(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    list.before_begin().insert_after(1).expect("insert");

    assert_eq!(list.front(), Ok(&1));
    assert_eq!(list.len(), 1);
}

#[rstest]
fn test_erase_after_first_element(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    for value in [1, 2, 3] {
        list.push_front(value).expect("push");
    }

    let next = list.cursor_front_mut().erase_after().expect("erase").copied();
    assert_eq!(next, Some(1));
    assert_eq!(list.len(), 2);
    assert_eq!(list.front(), Ok(&3));
    assert_eq!(list.iter().nth(1), Some(&1));
    assert_eq!(pool.free_blocks(), 1);
}

#[rstest]
fn test_erase_after_last_element_fails(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    list.push_front(1).expect("push");

    let err = list.cursor_front_mut().erase_after().expect_err("no successor");
    assert_eq!(err, ListError::invalid_position("erase_after"));
    assert_eq!(collect(&list), [1]);
    assert_eq!(pool.active_blocks(), 1);
}

// ---------------------------------------------------------------------------
// Copy and move
// ---------------------------------------------------------------------------

#[rstest]
fn test_clone_copies_every_element(pool: BlockPool<'static>) {
    let mut original = ForwardList::new_in(&pool);
    original.push_front(2).expect("push");
    original.push_front(1).expect("push");

    let copy = original.clone();
    assert_eq!(copy.len(), original.len());
    assert_eq!(collect(&copy), collect(&original));
}

#[rstest]
fn test_rust_move_keeps_nodes(pool: BlockPool<'static>) {
    let mut original = ForwardList::new_in(&pool);
    original.push_front(2).expect("push");
    original.push_front(1).expect("push");

    let moved = original;
    assert_eq!(moved.len(), 2);
    assert_eq!(collect(&moved), [1, 2]);
    assert_eq!(pool.block_count(), 2);
}

#[rstest]
fn test_clone_from_same_pool(pool: BlockPool<'static>) {
    let mut original = ForwardList::new_in(&pool);
    original.push_front(2).expect("push");
    original.push_front(1).expect("push");

    let mut copy = ForwardList::new_in(&pool);
    copy.clone_from(&original);
    assert_eq!(copy, original);
}

#[rstest]
fn test_move_from_same_pool(pool: BlockPool<'static>) {
    let mut original = ForwardList::new_in(&pool);
    original.push_front(2).expect("push");
    original.push_front(1).expect("push");

    let mut moved = ForwardList::new_in(&pool);
    let outcome = moved.move_from(&mut original).expect("move");

    assert_eq!(outcome, MoveOutcome::Transferred);
    assert!(original.is_empty());
    assert_eq!(moved.len(), 2);
    assert_eq!(collect(&moved), [1, 2]);
}

// ---------------------------------------------------------------------------
// Element types
// ---------------------------------------------------------------------------

#[rstest]
fn test_strings(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    list.push_front(String::from("world")).expect("push");
    list.push_front(String::from("hello")).expect("push");

    assert_eq!(list.front().map(String::as_str), Ok("hello"));
    assert_eq!(list.pop_front().as_deref(), Ok("hello"));
    assert_eq!(list.front().map(String::as_str), Ok("world"));
}

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[rstest]
fn test_custom_struct(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    list.push_front(Point { x: 2, y: 3 }).expect("push");
    list.push_front(Point { x: 1, y: 2 }).expect("push");

    assert_eq!(list.front(), Ok(&Point { x: 1, y: 2 }));
}

#[rstest]
fn test_zero_sized_elements(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    for _ in 0..3 {
        list.push_front(()).expect("push");
    }
    assert_eq!(list.len(), 3);
    // Each node still carries a link, so each takes a block
    assert_eq!(pool.active_blocks(), 3);
}

// ---------------------------------------------------------------------------
// Clear and drop
// ---------------------------------------------------------------------------

#[rstest]
fn test_clear(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    for value in [3, 2, 1] {
        list.push_front(value).expect("push");
    }
    assert_eq!(list.len(), 3);

    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
    assert_eq!(pool.active_blocks(), 0);
}

#[rstest]
fn test_drop_returns_every_node(pool: BlockPool<'static>) {
    {
        let mut list = ForwardList::new_in(&pool);
        for value in 0..32 {
            list.push_front(value).expect("push");
        }
        assert_eq!(pool.active_blocks(), 32);
    }
    assert_eq!(pool.active_blocks(), 0);
    assert_eq!(pool.free_blocks(), 32);
}

#[rstest]
fn test_pool_reuses_released_nodes(pool: BlockPool<'static>) {
    let mut list = ForwardList::new_in(&pool);
    for round in 0..5 {
        for value in 0..8 {
            list.push_front(value * round).expect("push");
        }
        list.clear();
    }
    assert_eq!(pool.block_count(), 8);
}
