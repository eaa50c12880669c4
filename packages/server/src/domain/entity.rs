//! Entities of the pairing domain.

use super::{
    error::RoomError,
    value_object::{ConnectionId, RoomId, Seat, Timestamp},
};

const ROOM_CAPACITY: usize = 2;

/// Lifecycle state of a room, derived from its occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    /// No participant; the directory never stores a room in this state.
    Empty,
    /// One participant waiting for an opponent.
    Waiting,
    /// Both seats taken.
    Active,
}

/// A two-seat room.
///
/// Seats are fixed slots: a newcomer always takes the lowest vacant seat, so
/// two participants of the same room never share a seat.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    seats: [Option<ConnectionId>; ROOM_CAPACITY],
    pub created_at: Timestamp,
}

impl Room {
    pub const CAPACITY: usize = ROOM_CAPACITY;

    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            seats: [None, None],
            created_at,
        }
    }

    /// Seat a connection in the lowest vacant seat.
    pub fn seat(&mut self, connection_id: ConnectionId) -> Result<Seat, RoomError> {
        if self.contains(&connection_id) {
            return Err(RoomError::AlreadySeated);
        }

        let seat = Seat::ALL
            .into_iter()
            .find(|seat| self.seats[seat.index()].is_none())
            .ok_or(RoomError::CapacityExceeded)?;
        self.seats[seat.index()] = Some(connection_id);

        Ok(seat)
    }

    /// Free the seat held by `connection_id`, if any.
    pub fn vacate(&mut self, connection_id: &ConnectionId) -> Option<Seat> {
        let seat = self.seat_of(connection_id)?;
        self.seats[seat.index()] = None;
        Some(seat)
    }

    pub fn seat_of(&self, connection_id: &ConnectionId) -> Option<Seat> {
        Seat::ALL
            .into_iter()
            .find(|seat| self.seats[seat.index()].as_ref() == Some(connection_id))
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.seat_of(connection_id).is_some()
    }

    /// Participants in seat order.
    pub fn participants(&self) -> Vec<ConnectionId> {
        self.seats.iter().flatten().cloned().collect()
    }

    /// Every participant except `connection_id`.
    pub fn opponents_of(&self, connection_id: &ConnectionId) -> Vec<ConnectionId> {
        self.seats
            .iter()
            .flatten()
            .filter(|id| *id != connection_id)
            .cloned()
            .collect()
    }

    pub fn participant_count(&self) -> usize {
        self.seats.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.participant_count() == 0
    }

    pub fn state(&self) -> RoomState {
        match self.participant_count() {
            0 => RoomState::Empty,
            1 => RoomState::Waiting,
            _ => RoomState::Active,
        }
    }
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq)]
pub struct Seating {
    pub room_id: RoomId,
    pub seat: Seat,
    /// Room members after the join, in seat order.
    pub participants: Vec<ConnectionId>,
}

impl Seating {
    /// Whether this join filled the room (Waiting -> Active).
    pub fn starts_session(&self) -> bool {
        self.participants.len() == Room::CAPACITY
    }
}

/// One room membership cleared by a disconnect.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub room_id: RoomId,
    pub seat: Seat,
    /// Members left behind, in seat order.
    pub remaining: Vec<ConnectionId>,
    /// Whether the room was deleted from the directory.
    pub room_removed: bool,
}
