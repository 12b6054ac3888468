pub struct Cmd;
impl Cmd {
    // Init
    pub const DRIVER_CONTROL: u8 = 0x01;
    pub const GATE_VOLTAGE_CONTROL: u8 = 0x03;
    pub const SOURCE_VOLTAGE_CONTROL: u8 = 0x04;
    pub const DEEP_SLEEP_MODE: u8 = 0x10;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SW_RESET: u8 = 0x12;
    pub const TEMP_CONTROL: u8 = 0x18;
    pub const WRITE_VCOM_REGISTER: u8 = 0x2C;
    pub const WRITE_LUT_REGISTER: u8 = 0x32;
    pub const WRITE_DUMMY_LINE_PERIOD: u8 = 0x3A;
    pub const SET_GATE_LINE_WIDTH: u8 = 0x3B;
    pub const BORDER_WAVEFORM_CONTROL: u8 = 0x3C;
    pub const WRITE_DISPLAY_OPTION: u8 = 0x37;
    pub const ANALOG_BLOCK_CONTROL: u8 = 0x74;
    pub const DIGITAL_BLOCK_CONTROL: u8 = 0x7E;

    // Update
    pub const SET_RAMX_START_END: u8 = 0x44;
    pub const SET_RAMY_START_END: u8 = 0x45;
    pub const SET_RAMX_COUNTER: u8 = 0x4E;
    pub const SET_RAMY_COUNTER: u8 = 0x4F;
    pub const WRITE_BW_DATA: u8 = 0x24;
    pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;
    pub const MASTER_ACTIVATE: u8 = 0x20;
}
