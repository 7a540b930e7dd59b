use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! chat_icons {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Built-in icons known by the chat platform.
        ///
        /// The wire format carries the icon name verbatim, so adding an icon
        /// only requires a new entry here.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ChatIcon {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl ChatIcon {
            pub const ALL: &'static [ChatIcon] = &[$(ChatIcon::$variant),*];

            pub fn name(self) -> &'static str {
                match self {
                    $(ChatIcon::$variant => $name,)*
                }
            }
        }

        impl FromStr for ChatIcon {
            type Err = UnknownIcon;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim() {
                    $($name => Ok(ChatIcon::$variant),)*
                    other => Err(UnknownIcon(other.to_string())),
                }
            }
        }
    };
}

chat_icons! {
    Airplane => "AIRPLANE",
    Bookmark => "BOOKMARK",
    Bus => "BUS",
    Car => "CAR",
    Clock => "CLOCK",
    ConfirmationNumberIcon => "CONFIRMATION_NUMBER_ICON",
    Description => "DESCRIPTION",
    Dollar => "DOLLAR",
    Email => "EMAIL",
    EventSeat => "EVENT_SEAT",
    FlightArrival => "FLIGHT_ARRIVAL",
    FlightDeparture => "FLIGHT_DEPARTURE",
    Hotel => "HOTEL",
    HotelRoomType => "HOTEL_ROOM_TYPE",
    Invite => "INVITE",
    MapPin => "MAP_PIN",
    Membership => "MEMBERSHIP",
    MultiplePeople => "MULTIPLE_PEOPLE",
    Person => "PERSON",
    Phone => "PHONE",
    RestaurantIcon => "RESTAURANT_ICON",
    ShoppingCart => "SHOPPING_CART",
    Star => "STAR",
    Store => "STORE",
    Ticket => "TICKET",
    Train => "TRAIN",
    VideoCamera => "VIDEO_CAMERA",
    VideoPlay => "VIDEO_PLAY",
}

impl fmt::Display for ChatIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chat icon `{0}`")]
pub struct UnknownIcon(pub String);
