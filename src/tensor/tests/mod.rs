mod new;
mod pad;
mod property;
