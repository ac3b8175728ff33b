//! Room and user directory.
//!
//! Tracks which rooms we are in and which remote identities are present in
//! each of them. Every entry owns the adapter handle it was created with.
//!
//! ## Ownership
//!
//! - Insertion takes a handle by value. If the name is already taken the
//!   handle is given back so the caller can release it.
//! - Removal returns the whole entry. The caller passes the contained handle
//!   back to the adapter; nothing here releases handles on its own.
//! - The same identity in two rooms is two independent [`User`] entries.

use std::collections::{HashMap, hash_map::Entry};

/// A remote identity's presence in one room.
#[derive(Debug)]
pub struct User<U> {
    name: String,
    handle: U,
}

impl<U> User<U> {
    /// Nickname of the remote identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adapter handle for this user in this room.
    pub fn handle(&self) -> &U {
        &self.handle
    }

    /// Give up the entry, keeping only its handle.
    pub fn into_handle(self) -> U {
        self.handle
    }
}

/// A room we are a member of.
#[derive(Debug)]
pub struct Room<R, U> {
    name: String,
    handle: R,
    users: HashMap<String, User<U>>,
}

impl<R, U> Room<R, U> {
    fn new(name: String, handle: R) -> Self {
        Self { name, handle, users: HashMap::new() }
    }

    /// Room name, including its marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adapter handle for the room session.
    pub fn handle(&self) -> &R {
        &self.handle
    }

    /// Mutable adapter handle for the room session.
    pub fn handle_mut(&mut self) -> &mut R {
        &mut self.handle
    }

    /// Check if `name` is present in this room.
    pub fn has_user(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    /// Look up a user by exact name.
    pub fn user(&self, name: &str) -> Option<&User<U>> {
        self.users.get(name)
    }

    /// Iterate over present users in no particular order.
    pub fn users(&self) -> impl Iterator<Item = &User<U>> {
        self.users.values()
    }

    /// Number of present users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Borrow the room handle together with `user`'s handle, if present.
    ///
    /// Adapter calls about a user need both at once.
    pub fn handles_mut(&mut self, user: &str) -> (&mut R, Option<&mut U>) {
        let user = self.users.get_mut(user).map(|entry| &mut entry.handle);
        (&mut self.handle, user)
    }

    /// Record `name` as present.
    ///
    /// # Errors
    ///
    /// Returns the handle unchanged if `name` is already present.
    pub fn insert_user(&mut self, name: &str, handle: U) -> Result<&User<U>, U> {
        match self.users.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(handle),
            Entry::Vacant(slot) => Ok(slot.insert(User { name: name.to_owned(), handle })),
        }
    }

    /// Remove `name`, returning its entry if it was present.
    #[must_use = "the removed user's handle must be released"]
    pub fn remove_user(&mut self, name: &str) -> Option<User<U>> {
        self.users.remove(name)
    }

    /// Split the room into its own handle and its users' entries.
    pub fn into_parts(self) -> (R, Vec<User<U>>) {
        (self.handle, self.users.into_values().collect())
    }
}

/// All rooms we are a member of, keyed by exact name.
#[derive(Debug)]
pub struct Directory<R, U> {
    rooms: HashMap<String, Room<R, U>>,
}

impl<R, U> Directory<R, U> {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self { rooms: HashMap::new() }
    }

    /// Number of tracked rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Check if no rooms are tracked.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Check if `name` is tracked.
    pub fn contains(&self, name: &str) -> bool {
        self.rooms.contains_key(name)
    }

    /// Look up a room by exact name.
    pub fn get(&self, name: &str) -> Option<&Room<R, U>> {
        self.rooms.get(name)
    }

    /// Look up a room by exact name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Room<R, U>> {
        self.rooms.get_mut(name)
    }

    /// Iterate over tracked rooms in no particular order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room<R, U>> {
        self.rooms.values()
    }

    /// Start tracking `name` with an empty user set.
    ///
    /// # Errors
    ///
    /// Returns the handle unchanged if `name` is already tracked.
    pub fn insert(&mut self, name: &str, handle: R) -> Result<&mut Room<R, U>, R> {
        match self.rooms.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(handle),
            Entry::Vacant(slot) => Ok(slot.insert(Room::new(name.to_owned(), handle))),
        }
    }

    /// Stop tracking `name`, returning its entry if it was tracked.
    #[must_use = "the removed room's handles must be released"]
    pub fn remove(&mut self, name: &str) -> Option<Room<R, U>> {
        self.rooms.remove(name)
    }

    /// Remove every room.
    #[must_use = "the removed rooms' handles must be released"]
    pub fn drain(&mut self) -> Vec<Room<R, U>> {
        self.rooms.drain().map(|(_, room)| room).collect()
    }
}

impl<R, U> Default for Directory<R, U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    type TestDirectory = Directory<u32, u32>;

    #[test]
    fn new_directory_is_empty() {
        let dir = TestDirectory::new();
        assert!(dir.is_empty());
        assert!(dir.get("#room").is_none());
    }

    #[test]
    fn insert_room_starts_without_users() {
        let mut dir = TestDirectory::new();
        dir.insert("#room", 1).unwrap();

        let room = dir.get("#room").unwrap();
        assert_eq!(room.name(), "#room");
        assert_eq!(*room.handle(), 1);
        assert_eq!(room.user_count(), 0);
    }

    #[test]
    fn duplicate_room_hands_handle_back() {
        let mut dir = TestDirectory::new();
        dir.insert("#room", 1).unwrap();

        assert_eq!(dir.insert("#room", 2).err(), Some(2));
        assert_eq!(*dir.get("#room").unwrap().handle(), 1);
    }

    #[test]
    fn lookups_are_case_sensitive() {
        let mut dir = TestDirectory::new();
        dir.insert("#Room", 1).unwrap();

        assert!(dir.contains("#Room"));
        assert!(!dir.contains("#room"));
    }

    #[test]
    fn remove_returns_entry_once() {
        let mut dir = TestDirectory::new();
        dir.insert("#room", 7).unwrap();

        let room = dir.remove("#room").unwrap();
        assert_eq!(room.into_parts().0, 7);
        assert!(dir.remove("#room").is_none());
    }

    #[test]
    fn users_are_scoped_per_room() {
        let mut dir = TestDirectory::new();
        dir.insert("#a", 1).unwrap();
        dir.insert("#b", 2).unwrap();

        dir.get_mut("#a").unwrap().insert_user("alice", 10).unwrap();
        dir.get_mut("#b").unwrap().insert_user("alice", 20).unwrap();

        let from_a = dir.get_mut("#a").unwrap().remove_user("alice").unwrap();
        assert_eq!(from_a.into_handle(), 10);
        assert_eq!(*dir.get("#b").unwrap().user("alice").unwrap().handle(), 20);
    }

    #[test]
    fn duplicate_user_hands_handle_back() {
        let mut dir = TestDirectory::new();
        let room = dir.insert("#room", 1).unwrap();
        room.insert_user("alice", 10).unwrap();

        assert_eq!(room.insert_user("alice", 11).err(), Some(11));
    }

    #[test]
    fn removing_absent_user_is_none() {
        let mut dir = TestDirectory::new();
        let room = dir.insert("#room", 1).unwrap();

        assert!(room.remove_user("ghost").is_none());
    }

    #[test]
    fn handles_mut_reaches_both_handles() {
        let mut dir = TestDirectory::new();
        let room = dir.insert("#room", 1).unwrap();
        room.insert_user("alice", 10).unwrap();

        let (room_handle, user_handle) = room.handles_mut("alice");
        *room_handle += 1;
        *user_handle.unwrap() += 1;

        let (room_handle, user_handle) = room.handles_mut("bob");
        assert_eq!(*room_handle, 2);
        assert!(user_handle.is_none());
        assert_eq!(*room.user("alice").unwrap().handle(), 11);
    }

    #[test]
    fn into_parts_yields_every_user() {
        let mut dir = TestDirectory::new();
        let room = dir.insert("#room", 1).unwrap();
        room.insert_user("alice", 10).unwrap();
        room.insert_user("bob", 11).unwrap();

        let (handle, users) = dir.remove("#room").unwrap().into_parts();
        let mut handles: Vec<_> = users.into_iter().map(User::into_handle).collect();
        handles.sort_unstable();

        assert_eq!(handle, 1);
        assert_eq!(handles, vec![10, 11]);
    }

    #[test]
    fn drain_empties_directory() {
        let mut dir = TestDirectory::new();
        dir.insert("#a", 1).unwrap();
        dir.insert("#b", 2).unwrap();

        assert_eq!(dir.drain().len(), 2);
        assert!(dir.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        InsertRoom(u8),
        RemoveRoom(u8),
        InsertUser(u8, u8),
        RemoveUser(u8, u8),
        Drain,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0u8..3).prop_map(Op::InsertRoom),
            1 => (0u8..3).prop_map(Op::RemoveRoom),
            3 => (0u8..3, 0u8..3).prop_map(|(r, u)| Op::InsertUser(r, u)),
            2 => (0u8..3, 0u8..3).prop_map(|(r, u)| Op::RemoveUser(r, u)),
            1 => Just(Op::Drain),
        ]
    }

    fn held(dir: &TestDirectory) -> BTreeSet<u32> {
        dir.rooms()
            .flat_map(|room| {
                std::iter::once(*room.handle()).chain(room.users().map(|u| *u.handle()))
            })
            .collect()
    }

    fn give_back(returned: &mut Vec<u32>, room: Room<u32, u32>) {
        let (handle, users) = room.into_parts();
        returned.push(handle);
        returned.extend(users.into_iter().map(User::into_handle));
    }

    proptest! {
        #[test]
        fn every_handle_is_held_or_returned_exactly_once(
            ops in prop::collection::vec(op_strategy(), 0..80)
        ) {
            let mut dir = TestDirectory::new();
            let mut next = 0u32;
            let mut returned = Vec::new();

            for op in &ops {
                match *op {
                    Op::InsertRoom(r) => {
                        next += 1;
                        if let Err(handle) = dir.insert(&format!("#r{r}"), next) {
                            returned.push(handle);
                        }
                    },
                    Op::RemoveRoom(r) => {
                        if let Some(room) = dir.remove(&format!("#r{r}")) {
                            give_back(&mut returned, room);
                        }
                    },
                    Op::InsertUser(r, u) => {
                        if let Some(room) = dir.get_mut(&format!("#r{r}")) {
                            next += 1;
                            if let Err(handle) = room.insert_user(&format!("u{u}"), next) {
                                returned.push(handle);
                            }
                        }
                    },
                    Op::RemoveUser(r, u) => {
                        if let Some(room) = dir.get_mut(&format!("#r{r}")) {
                            if let Some(user) = room.remove_user(&format!("u{u}")) {
                                returned.push(user.into_handle());
                            }
                        }
                    },
                    Op::Drain => {
                        for room in dir.drain() {
                            give_back(&mut returned, room);
                        }
                    },
                }

                let live = held(&dir);
                let gone: BTreeSet<u32> = returned.iter().copied().collect();
                prop_assert_eq!(gone.len(), returned.len(), "handle returned twice");
                prop_assert!(live.is_disjoint(&gone));
                prop_assert_eq!(live.len() + gone.len(), next as usize);
            }
        }
    }
}
